//! CSB collision scene container
//!
//! Layout, in order:
//! 1. sphere and box trigger records, then their names, flags and node indices
//! 2. mesh table over the combined model (offsets, flags, attributes, names)
//! 3. the flattened node list
//! 4. the combined model: header, bounds, positions, triangles
//! 5. a trailer with the split models, present when the combined model
//!    carries the sentinel name

use std::ops::Range;
use std::path::Path;

use super::binary::{BinaryReader, BinaryWriter, FIXED_NAME_LEN};
use super::node_tree::Node;
use super::{checked_width, envelope, FormatError, FormatResult, FormatRevision};
use crate::collision::{BoundingBox, Triangle};
use crate::foundation::math::Vec3;

/// Name of the model whose buffers are shared by every mesh
pub const COMBINED_MODEL_NAME: &str = "DEADBEEF";

/// Tag at the start of every model header
pub const MODEL_FORMAT_TAG: u32 = 3;

/// Marker following the fixed model name
pub const MODEL_HEADER_MARKER: u32 = 1;

/// Marker following the object records
pub const OBJECT_SECTION_MARKER: u32 = 1;

/// Marker opening the mesh table
pub const MESH_TABLE_REVISION: u16 = 2;

/// Two bytes opening the split-model trailer
pub const TRAILER_TAG: [u8; 2] = [0xFE, 0x07];

/// Auxiliary floats every observed box record carries
pub const DEFAULT_BOX_EXTRA: [f32; 9] = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];

/// Radius given to spheres created without one
pub const DEFAULT_SPHERE_RADIUS: f32 = 0.7;

const RESERVED_OBJECT_BYTES: usize = 16;

/// Constants carried through a decode/encode cycle unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMarkers {
    /// Marker after the object records
    pub object_marker: u32,
    /// Marker opening the mesh table
    pub mesh_revision: u16,
    /// Bytes opening the split-model trailer
    pub trailer_tag: [u8; 2],
}

impl Default for HeaderMarkers {
    fn default() -> Self {
        Self {
            object_marker: OBJECT_SECTION_MARKER,
            mesh_revision: MESH_TABLE_REVISION,
            trailer_tag: TRAILER_TAG,
        }
    }
}

/// Shape-specific part of a trigger volume
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    /// Sphere trigger
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Oriented box trigger
    Box {
        /// Box extent per axis
        size: Vec3,
        /// Euler rotation in radians
        rotation: Vec3,
        /// Auxiliary floats, kept verbatim
        extra: [f32; 9],
    },
}

/// A sphere or box trigger volume
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionObject {
    /// Display name
    pub name: String,
    /// Sphere or box payload
    pub shape: ObjectShape,
    /// Leading float of the record, zero in every observed file
    pub reserved: f32,
    /// First anchor point
    pub point1: Vec3,
    /// Second anchor point; observed equal to `point1`
    pub point2: Vec3,
    /// Collision flag bitmask
    pub col_flag: u64,
    /// Node this object hangs from
    pub node_index: u16,
}

impl CollisionObject {
    /// Sphere anchored at `position`
    pub fn sphere(name: impl Into<String>, position: Vec3, radius: f32) -> Self {
        Self {
            name: name.into(),
            shape: ObjectShape::Sphere { radius },
            reserved: 0.0,
            point1: position,
            point2: position,
            col_flag: 0,
            node_index: 0,
        }
    }

    /// Box anchored at `position`
    pub fn cuboid(name: impl Into<String>, position: Vec3, size: Vec3, rotation: Vec3) -> Self {
        Self {
            name: name.into(),
            shape: ObjectShape::Box {
                size,
                rotation,
                extra: DEFAULT_BOX_EXTRA,
            },
            reserved: 0.0,
            point1: position,
            point2: position,
            col_flag: 0,
            node_index: 0,
        }
    }

    /// True for sphere triggers
    pub fn is_sphere(&self) -> bool {
        matches!(self.shape, ObjectShape::Sphere { .. })
    }
}

/// One logical mesh inside the combined model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mesh {
    /// Mesh name
    pub name: String,
    /// Surface material id
    pub material_attribute: u32,
    /// Collision flag bitmask
    pub col_flag: u64,
    /// Node this mesh hangs from
    pub node_index: u16,
    /// Range into the combined model's triangles
    pub triangles: Range<u32>,
    /// Range into the combined model's positions
    pub vertices: Range<u32>,
}

impl Mesh {
    /// Mesh with no geometry, anchored at the given buffer offsets
    pub fn empty(name: impl Into<String>, node_index: u16, triangle_start: u32, vertex_start: u32) -> Self {
        Self {
            name: name.into(),
            node_index,
            triangles: triangle_start..triangle_start,
            vertices: vertex_start..vertex_start,
            ..Default::default()
        }
    }

    /// Number of triangles in range
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

/// A geometry block
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Model name; the combined model uses [`COMBINED_MODEL_NAME`]
    pub name: String,
    /// Header tag, [`MODEL_FORMAT_TAG`] in every observed file
    pub format_tag: u32,
    /// Node this model hangs from
    pub node_index: u16,
    /// Collision flag bitmask (split models)
    pub col_flag: u64,
    /// Surface material id (split models)
    pub material_attribute: u32,
    /// Reserved word present in the current revision only
    pub reserved: u32,
    /// Marker after the name, [`MODEL_HEADER_MARKER`]
    pub marker: u32,
    /// Vector stored ahead of the transform, zero in every observed file
    pub origin: Vec3,
    /// Translation
    pub translate: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Bounds of `positions`
    pub bounds: BoundingBox,
    /// Vertex buffer
    pub positions: Vec<Vec3>,
    /// Triangle buffer; vertex indices address `positions`
    pub triangles: Vec<Triangle>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            name: String::new(),
            format_tag: MODEL_FORMAT_TAG,
            node_index: 0,
            col_flag: 0,
            material_attribute: 0,
            reserved: 0,
            marker: MODEL_HEADER_MARKER,
            origin: Vec3::zeros(),
            translate: Vec3::zeros(),
            rotation: Vec3::zeros(),
            bounds: BoundingBox::default(),
            positions: Vec::new(),
            triangles: Vec::new(),
        }
    }
}

impl Model {
    /// Empty model with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Empty model carrying the shared-buffer sentinel name
    pub fn combined() -> Self {
        Self::new(COMBINED_MODEL_NAME)
    }

    /// True for the shared-buffer model
    pub fn is_combined(&self) -> bool {
        self.name == COMBINED_MODEL_NAME
    }

    /// Recompute `bounds` from `positions`
    pub fn compute_bounds(&mut self) {
        self.bounds.compute(&self.positions);
    }
}

/// A decoded collision scene
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsbFile {
    /// Flattened pre-order node list
    pub nodes: Vec<Node>,
    /// Trigger volumes.
    ///
    /// Spheres first is the canonical order: encoding writes every sphere
    /// before any box, so a decode returns them in that order. Fill through
    /// [`CsbFile::push_object`] to keep the in-memory order canonical too.
    pub objects: Vec<CollisionObject>,
    /// Meshes over the combined model
    pub meshes: Vec<Mesh>,
    /// The combined model followed by split models
    pub models: Vec<Model>,
    /// Aggregate bounds of the split models
    pub sub_model_bounds: BoundingBox,
    /// Constant markers
    pub markers: HeaderMarkers,
}

impl CsbFile {
    /// The first model, normally the combined one
    pub fn combined_model(&self) -> Option<&Model> {
        self.models.first()
    }

    /// Models after the combined one
    pub fn split_models(&self) -> &[Model] {
        self.models.get(1..).unwrap_or_default()
    }

    /// Triangles of `mesh`, sliced from the combined model
    pub fn mesh_triangles(&self, mesh: &Mesh) -> &[Triangle] {
        self.combined_model()
            .and_then(|model| {
                model
                    .triangles
                    .get(mesh.triangles.start as usize..mesh.triangles.end as usize)
            })
            .unwrap_or_default()
    }

    /// Add a trigger object, keeping spheres ahead of boxes in insertion order
    pub fn push_object(&mut self, object: CollisionObject) {
        if object.is_sphere() {
            let at = self.objects.iter().take_while(|o| o.is_sphere()).count();
            self.objects.insert(at, object);
        } else {
            self.objects.push(object);
        }
    }

    fn ordered_objects(&self) -> impl Iterator<Item = &CollisionObject> {
        let spheres = self.objects.iter().filter(|o| o.is_sphere());
        let boxes = self.objects.iter().filter(|o| !o.is_sphere());
        spheres.chain(boxes)
    }

    /// Read and decode a file, unwrapping the envelope by suffix
    pub fn read_file(path: &Path, revision: FormatRevision) -> FormatResult<Self> {
        let data = envelope::read_file(path)?;
        Self::decode(&data, revision)
    }

    /// Encode and write a file, wrapping the envelope by suffix
    pub fn write_file(&self, path: &Path, revision: FormatRevision) -> FormatResult<()> {
        let data = self.encode(revision)?;
        envelope::write_file(path, &data)
    }

    /// Decode an unwrapped CSB payload
    pub fn decode(data: &[u8], revision: FormatRevision) -> FormatResult<Self> {
        let mut reader = BinaryReader::new(data, revision);
        let mut file = Self::default();

        file.objects = read_objects(&mut reader, &mut file.markers)?;

        reader.set_section("meshes");
        file.markers.mesh_revision = reader.read_u16("revision")?;
        let model_count = reader.read_u16("model_count")?;
        if model_count > 1 {
            return Err(FormatError::Unsupported {
                section: "meshes",
                reason: format!("{model_count} models share the mesh table"),
            });
        }
        let table = read_mesh_table(&mut reader)?;

        reader.set_section("nodes");
        let node_count = reader.read_u16("node_count")?;
        file.nodes = reader.read_array(usize::from(node_count), |r| {
            Ok(Node {
                id: r.read_u16("id")?,
                flags: r.read_u8("flags")?,
                child_count: r.read_u8("child_count")?,
            })
        })?;

        reader.set_section("model");
        if model_count == 1 {
            let combined = read_model(&mut reader)?;
            file.meshes = table.into_meshes(&combined)?;
            file.models.push(combined);
        } else {
            file.meshes = table.into_meshes(&Model::default())?;
        }

        if reader.remaining() > 0 {
            reader.set_section("trailer");
            reader.read_u32("reserved")?;
            file.markers.trailer_tag = [reader.read_u8("tag")?, reader.read_u8("tag")?];
            reader.read_u16("padding")?;
            let split_count = reader.read_u32("split_count")?;
            file.sub_model_bounds = reader.read_bounds("sub_model_bounds")?;

            reader.set_section("split_models");
            for _ in 0..split_count {
                file.models.push(read_model(&mut reader)?);
            }
        }

        if reader.remaining() > 0 {
            log::warn!("{} trailing bytes after collision scene", reader.remaining());
        }

        log::debug!(
            "Decoded collision scene: {} nodes, {} objects, {} meshes, {} models",
            file.nodes.len(),
            file.objects.len(),
            file.meshes.len(),
            file.models.len()
        );

        Ok(file)
    }

    /// Encode into an unwrapped CSB payload
    pub fn encode(&self, revision: FormatRevision) -> FormatResult<Vec<u8>> {
        let mut writer = BinaryWriter::new(revision);

        self.write_objects(&mut writer)?;
        self.write_mesh_table(&mut writer)?;

        writer.write_u16(checked_width("node_count", self.nodes.len(), u64::from(u16::MAX))?);
        for node in &self.nodes {
            writer.write_u16(node.id);
            writer.write_u8(node.flags);
            writer.write_u8(node.child_count);
        }

        let Some(combined) = self.models.first() else {
            return Ok(writer.into_inner());
        };

        write_model(&mut writer, combined)?;

        if combined.is_combined() {
            writer.write_u32(0);
            writer.write_bytes(&self.markers.trailer_tag);
            writer.write_u16(0);
            writer.write_u32(checked_width(
                "split_count",
                self.split_models().len(),
                u64::from(u32::MAX),
            )?);
            writer.write_bounds(&self.sub_model_bounds);
            for model in self.split_models() {
                write_model(&mut writer, model)?;
            }
        } else if !self.split_models().is_empty() {
            return Err(FormatError::Unsupported {
                section: "split_models",
                reason: format!(
                    "split models need a leading '{COMBINED_MODEL_NAME}' model, found '{}'",
                    combined.name
                ),
            });
        }

        Ok(writer.into_inner())
    }

    fn write_objects(&self, writer: &mut BinaryWriter) -> FormatResult<()> {
        let sphere_count = self.objects.iter().filter(|o| o.is_sphere()).count();
        let box_count = self.objects.len() - sphere_count;

        writer.write_u32(checked_width("sphere_count", sphere_count, u64::from(u32::MAX))?);
        for object in self.ordered_objects() {
            if let ObjectShape::Sphere { radius } = object.shape {
                writer.write_f32(object.reserved);
                writer.write_vec3(&object.point1);
                writer.write_vec3(&object.point2);
                writer.write_f32(radius);
            }
        }

        writer.write_u32(checked_width("box_count", box_count, u64::from(u32::MAX))?);
        for object in self.ordered_objects() {
            if let ObjectShape::Box { size, rotation, extra } = &object.shape {
                writer.write_f32(object.reserved);
                writer.write_vec3(&object.point1);
                writer.write_vec3(&object.point2);
                writer.write_vec3(size);
                writer.write_vec3(rotation);
                for value in extra {
                    writer.write_f32(*value);
                }
            }
        }

        writer.write_u32(0);
        writer.write_u32(self.markers.object_marker);
        writer.write_zeros(RESERVED_OBJECT_BYTES);

        let (offsets, table) =
            super::binary::build_string_table(self.ordered_objects().map(|o| o.name.as_str()))?;
        for offset in offsets {
            writer.write_u32(offset);
        }
        for object in self.ordered_objects() {
            writer.write_flag("object_col_flag", object.col_flag)?;
        }
        for object in self.ordered_objects() {
            writer.write_u16(object.node_index);
        }
        writer.write_u32(checked_width("object_names", table.len(), u64::from(u32::MAX))?);
        writer.write_bytes(&table);
        Ok(())
    }

    fn write_mesh_table(&self, writer: &mut BinaryWriter) -> FormatResult<()> {
        writer.write_u16(self.markers.mesh_revision);
        writer.write_u16(u16::from(!self.models.is_empty()));
        writer.write_u32(checked_width("mesh_count", self.meshes.len(), u64::from(u32::MAX))?);

        let (offsets, table) =
            super::binary::build_string_table(self.meshes.iter().map(|m| m.name.as_str()))?;
        for offset in offsets {
            writer.write_u32(offset);
        }
        for mesh in &self.meshes {
            writer.write_u32(mesh.triangles.start);
        }
        for mesh in &self.meshes {
            writer.write_u32(mesh.vertices.start);
        }
        for mesh in &self.meshes {
            writer.write_flag("mesh_col_flag", mesh.col_flag)?;
        }
        for mesh in &self.meshes {
            writer.write_u32(mesh.material_attribute);
        }
        // Model index: every mesh lives in the combined model
        for _ in &self.meshes {
            writer.write_u32(0);
        }
        for mesh in &self.meshes {
            writer.write_u16(mesh.node_index);
        }
        writer.write_u32(checked_width("mesh_names", table.len(), u64::from(u32::MAX))?);
        writer.write_bytes(&table);
        Ok(())
    }
}

fn read_objects(
    reader: &mut BinaryReader<'_>,
    markers: &mut HeaderMarkers,
) -> FormatResult<Vec<CollisionObject>> {
    reader.set_section("objects");
    let mut objects = Vec::new();

    let sphere_count = reader.read_u32("sphere_count")?;
    for _ in 0..sphere_count {
        let reserved = reader.read_f32("reserved")?;
        let point1 = reader.read_vec3("point1")?;
        let point2 = reader.read_vec3("point2")?;
        let radius = reader.read_f32("radius")?;
        objects.push(CollisionObject {
            reserved,
            point1,
            point2,
            ..CollisionObject::sphere("", Vec3::zeros(), radius)
        });
    }

    let box_count = reader.read_u32("box_count")?;
    for _ in 0..box_count {
        let reserved = reader.read_f32("reserved")?;
        let point1 = reader.read_vec3("point1")?;
        let point2 = reader.read_vec3("point2")?;
        let size = reader.read_vec3("size")?;
        let rotation = reader.read_vec3("rotation")?;
        let mut extra = [0.0; 9];
        for value in &mut extra {
            *value = reader.read_f32("extra")?;
        }
        objects.push(CollisionObject {
            shape: ObjectShape::Box { size, rotation, extra },
            reserved,
            point1,
            point2,
            ..CollisionObject::sphere("", Vec3::zeros(), 0.0)
        });
    }

    let unused = reader.read_u32("unused_group")?;
    if unused != 0 {
        log::warn!("Unused object group count is {unused}, ignoring");
    }
    markers.object_marker = reader.read_u32("marker")?;
    reader.skip(RESERVED_OBJECT_BYTES, "reserved")?;

    let count = objects.len();
    let name_offsets = reader.read_array(count, |r| r.read_u32("name_offset"))?;
    let flags = reader.read_array(count, |r| r.read_flag("col_flag"))?;
    let node_indices = reader.read_array(count, |r| r.read_u16("node_index"))?;
    let names = reader.read_string_table("names")?;

    for (i, object) in objects.iter_mut().enumerate() {
        object.name = names.get(name_offsets[i])?;
        object.col_flag = flags[i];
        object.node_index = node_indices[i];
    }

    Ok(objects)
}

/// Mesh table as stored: parallel arrays whose ranges are resolved later
struct MeshTable {
    names: Vec<String>,
    triangle_offsets: Vec<u32>,
    vertex_offsets: Vec<u32>,
    flags: Vec<u64>,
    attributes: Vec<u32>,
    node_indices: Vec<u16>,
}

fn read_mesh_table(reader: &mut BinaryReader<'_>) -> FormatResult<MeshTable> {
    let count = reader.read_u32("mesh_count")? as usize;
    let name_offsets = reader.read_array(count, |r| r.read_u32("name_offset"))?;
    let triangle_offsets = reader.read_array(count, |r| r.read_u32("triangle_offset"))?;
    let vertex_offsets = reader.read_array(count, |r| r.read_u32("vertex_offset"))?;
    let flags = reader.read_array(count, |r| r.read_flag("col_flag"))?;
    let attributes = reader.read_array(count, |r| r.read_u32("material_attribute"))?;
    let model_indices = reader.read_array(count, |r| r.read_u32("model_index"))?;
    let node_indices = reader.read_array(count, |r| r.read_u16("node_index"))?;
    let table = reader.read_string_table("names")?;

    if model_indices.iter().any(|&i| i != 0) {
        log::warn!("Mesh table references models other than the combined one");
    }

    let names = name_offsets
        .iter()
        .map(|&offset| table.get(offset))
        .collect::<FormatResult<Vec<_>>>()?;

    Ok(MeshTable {
        names,
        triangle_offsets,
        vertex_offsets,
        flags,
        attributes,
        node_indices,
    })
}

impl MeshTable {
    /// Resolve start offsets into ranges over `model`'s buffers
    fn into_meshes(self, model: &Model) -> FormatResult<Vec<Mesh>> {
        let triangle_total = checked_width("triangle_count", model.triangles.len(), u64::from(u32::MAX))?;
        let vertex_total = checked_width("vertex_count", model.positions.len(), u64::from(u32::MAX))?;

        let mut meshes = Vec::with_capacity(self.names.len());
        for (m, name) in self.names.into_iter().enumerate() {
            let triangles = derive_range(&self.triangle_offsets, m, triangle_total, "triangle_offset")?;
            let vertices = derive_range(&self.vertex_offsets, m, vertex_total, "vertex_offset")?;

            let (triangles, vertices) = if triangles.is_empty() || triangle_total == 0 {
                (
                    triangles.start..triangles.start,
                    vertices.start..vertices.start,
                )
            } else {
                (triangles, vertices)
            };

            meshes.push(Mesh {
                name,
                material_attribute: self.attributes[m],
                col_flag: self.flags[m],
                node_index: self.node_indices[m],
                triangles,
                vertices,
            });
        }
        Ok(meshes)
    }
}

/// Range of mesh `m`: from its own offset to the next mesh's, or to the
/// model total for the last mesh. Non-increasing offsets give an empty range.
pub(crate) fn derive_range(
    offsets: &[u32],
    m: usize,
    total: u32,
    field: &'static str,
) -> FormatResult<Range<u32>> {
    let start = offsets[m];
    if start > total {
        return Err(FormatError::IndexOutOfRange {
            section: "meshes",
            field,
            index: u64::from(start),
            limit: u64::from(total),
        });
    }
    let end = offsets.get(m + 1).copied().unwrap_or(total).min(total);
    Ok(start..end.max(start))
}

fn read_model(reader: &mut BinaryReader<'_>) -> FormatResult<Model> {
    let format_tag = reader.read_u32("format_tag")?;
    let node_index = reader.read_u16("node_index")?;
    reader.read_u16("padding")?;
    let col_flag = reader.read_flag("col_flag")?;
    let material_attribute = reader.read_u32("material_attribute")?;
    let reserved = if reader.revision().has_wide_flags() {
        reader.read_u32("reserved")?
    } else {
        0
    };
    let name = reader.read_fixed_string(FIXED_NAME_LEN, "name")?;
    let marker = reader.read_u32("marker")?;
    let vertex_count = reader.read_u32("vertex_count")?;
    let triangle_count = reader.read_u32("triangle_count")?;
    let origin = reader.read_vec3("origin")?;
    let translate = reader.read_vec3("translate")?;
    let rotation = reader.read_vec3("rotation")?;
    let bounds = reader.read_bounds("bounds")?;
    let positions = reader.read_array(vertex_count as usize, |r| r.read_vec3("position"))?;

    let limit = positions.len();
    let mut triangles = Vec::new();
    for id in 0..triangle_count {
        let a = reader.read_u32("a")?;
        let b = reader.read_u32("b")?;
        let c = reader.read_u32("c")?;
        let normal = reader.read_vec3("normal")?;

        let mut vertices = [Vec3::zeros(); 3];
        for (slot, index) in vertices.iter_mut().zip([a, b, c]) {
            *slot = *positions.get(index as usize).ok_or(FormatError::IndexOutOfRange {
                section: reader.section(),
                field: "vertex_index",
                index: u64::from(index),
                limit: limit as u64,
            })?;
        }

        triangles.push(Triangle {
            a,
            b,
            c,
            normal,
            id,
            vertices,
        });
    }

    Ok(Model {
        name,
        format_tag,
        node_index,
        col_flag,
        material_attribute,
        reserved,
        marker,
        origin,
        translate,
        rotation,
        bounds,
        positions,
        triangles,
    })
}

fn write_model(writer: &mut BinaryWriter, model: &Model) -> FormatResult<()> {
    writer.write_u32(model.format_tag);
    writer.write_u16(model.node_index);
    writer.write_u16(0);
    writer.write_flag("model_col_flag", model.col_flag)?;
    writer.write_u32(model.material_attribute);
    if writer.revision().has_wide_flags() {
        writer.write_u32(model.reserved);
    }
    writer.write_fixed_string("model_name", &model.name, FIXED_NAME_LEN)?;
    writer.write_u32(model.marker);
    writer.write_u32(checked_width("vertex_count", model.positions.len(), u64::from(u32::MAX))?);
    writer.write_u32(checked_width("triangle_count", model.triangles.len(), u64::from(u32::MAX))?);
    writer.write_vec3(&model.origin);
    writer.write_vec3(&model.translate);
    writer.write_vec3(&model.rotation);

    writer.write_bounds(&model.bounds);
    for position in &model.positions {
        writer.write_vec3(position);
    }

    let limit = model.positions.len() as u64;
    for triangle in &model.triangles {
        for index in triangle.indices() {
            if u64::from(index) >= limit {
                return Err(FormatError::IndexOutOfRange {
                    section: "model",
                    field: "vertex_index",
                    index: u64::from(index),
                    limit,
                });
            }
            writer.write_u32(index);
        }
        writer.write_vec3(&triangle.normal);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_model() -> Model {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let triangles = [[0u32, 1, 2], [2, 1, 3]]
            .iter()
            .enumerate()
            .map(|(id, &[a, b, c])| Triangle {
                a,
                b,
                c,
                normal: Vec3::y(),
                id: id as u32,
                vertices: [positions[a as usize], positions[b as usize], positions[c as usize]],
            })
            .collect();
        let mut model = Model {
            positions,
            triangles,
            ..Model::combined()
        };
        model.compute_bounds();
        model
    }

    fn sample_file() -> CsbFile {
        let mut file = CsbFile {
            nodes: vec![Node::new(0, 2), Node::new(1, 0), Node::new(2, 0)],
            meshes: vec![
                Mesh::empty("Collision", 0, 0, 0),
                Mesh {
                    name: "Floor".into(),
                    material_attribute: 5,
                    col_flag: 3,
                    node_index: 1,
                    triangles: 0..2,
                    vertices: 0..4,
                },
            ],
            models: vec![quad_model()],
            sub_model_bounds: BoundingBox::uniform(crate::collision::SUB_MODEL_DEFAULT_EXTENT),
            ..Default::default()
        };
        let mut trigger = CollisionObject::cuboid(
            "Door",
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::new(0.0, 1.5, 0.0),
        );
        trigger.node_index = 2;
        trigger.col_flag = 9;
        file.push_object(trigger);
        file.push_object(CollisionObject::sphere("Orb", Vec3::new(4.0, 0.0, 4.0), 1.25));
        file
    }

    #[test]
    fn test_push_object_keeps_spheres_first() {
        let file = sample_file();
        assert!(file.objects[0].is_sphere());
        assert_eq!(file.objects[1].name, "Door");
    }

    #[test]
    fn test_encode_writes_spheres_before_boxes() {
        let mut file = sample_file();
        // bypass push_object with a box ahead of the sphere
        file.objects.swap(0, 1);
        assert!(!file.objects[0].is_sphere());

        let bytes = file.encode(FormatRevision::Current).unwrap();
        let decoded = CsbFile::decode(&bytes, FormatRevision::Current).unwrap();
        let names: Vec<&str> = decoded.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Orb", "Door"]);
        assert_eq!(decoded.objects[1].node_index, 2);
        assert_eq!(decoded, sample_file());
    }

    #[test]
    fn test_round_trip_current_revision() {
        let file = sample_file();
        let bytes = file.encode(FormatRevision::Current).unwrap();
        let decoded = CsbFile::decode(&bytes, FormatRevision::Current).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_round_trip_legacy_revision() {
        let file = sample_file();
        let bytes = file.encode(FormatRevision::Legacy).unwrap();
        let decoded = CsbFile::decode(&bytes, FormatRevision::Legacy).unwrap();
        assert_eq!(decoded, file);
        // Revisions are not interchangeable
        assert!(CsbFile::decode(&bytes, FormatRevision::Current).map_or(true, |d| d != file));
    }

    #[test]
    fn test_round_trip_with_split_models() {
        let mut file = sample_file();
        let mut split = quad_model();
        split.name = "Crate".into();
        split.node_index = 2;
        split.col_flag = 1 << 40;
        split.material_attribute = 7;
        split.translate = Vec3::new(5.0, 0.0, -5.0);
        file.models.push(split);
        file.sub_model_bounds = BoundingBox::from_positions(&file.models[1].positions);

        let bytes = file.encode(FormatRevision::Current).unwrap();
        let decoded = CsbFile::decode(&bytes, FormatRevision::Current).unwrap();
        assert_eq!(decoded.split_models().len(), 1);
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_legacy_rejects_wide_flags() {
        let mut file = sample_file();
        file.meshes[1].col_flag = 1 << 33;
        let err = file.encode(FormatRevision::Legacy).unwrap_err();
        assert!(matches!(err, FormatError::CapacityExceeded { field: "mesh_col_flag", .. }));
    }

    #[test]
    fn test_long_model_name_rejected() {
        let mut file = sample_file();
        file.models[0].name = "n".repeat(65);
        let err = file.encode(FormatRevision::Current).unwrap_err();
        assert!(matches!(
            err,
            FormatError::CapacityExceeded { field: "model_name", value: 65, capacity: 64 }
        ));
    }

    #[test]
    fn test_split_models_need_combined_sentinel() {
        let mut file = sample_file();
        file.models[0].name = "Plain".into();
        file.models.push(Model::new("Extra"));
        let err = file.encode(FormatRevision::Current).unwrap_err();
        assert!(matches!(err, FormatError::Unsupported { section: "split_models", .. }));
    }

    #[test]
    fn test_truncated_input_fails() {
        let bytes = sample_file().encode(FormatRevision::Current).unwrap();
        for cut in [3, bytes.len() / 2, bytes.len() - 1] {
            let err = CsbFile::decode(&bytes[..cut], FormatRevision::Current).unwrap_err();
            assert!(matches!(err, FormatError::UnexpectedEof { .. }), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn test_bad_vertex_index_fails() {
        let mut file = sample_file();
        file.models[0].triangles[1].c = 99;
        let err = file.encode(FormatRevision::Current).unwrap_err();
        assert!(matches!(err, FormatError::IndexOutOfRange { field: "vertex_index", index: 99, .. }));
    }

    #[test]
    fn test_bad_vertex_index_on_decode() {
        // Patch the last triangle's `c` index in an encoded legacy file
        let file = sample_file();
        let mut bytes = file.encode(FormatRevision::Legacy).unwrap();
        let trailer = 4 + 2 + 2 + 4 + 24;
        let c_offset = bytes.len() - trailer - 12 - 4;
        bytes[c_offset..c_offset + 4].copy_from_slice(&40u32.to_be_bytes());
        let err = CsbFile::decode(&bytes, FormatRevision::Legacy).unwrap_err();
        assert!(matches!(err, FormatError::IndexOutOfRange { index: 40, limit: 4, .. }));
    }

    #[test]
    fn test_bad_string_offset_fails() {
        let file = sample_file();
        let mut bytes = file.encode(FormatRevision::Legacy).unwrap();
        // First object name offset sits after the two records, three u32s and 16 reserved bytes
        let sphere_record = 4 + 12 + 12 + 4;
        let box_record = 4 + 12 * 4 + 36;
        let offset = 4 + sphere_record + 4 + box_record + 4 + 4 + 16;
        bytes[offset..offset + 4].copy_from_slice(&1000u32.to_be_bytes());
        let err = CsbFile::decode(&bytes, FormatRevision::Legacy).unwrap_err();
        assert!(matches!(err, FormatError::StringOffsetOutOfRange { offset: 1000, .. }));
    }

    #[test]
    fn test_mesh_range_derivation() {
        let offsets = [0, 3, 3, 7];
        assert_eq!(derive_range(&offsets, 0, 10, "t").unwrap(), 0..3);
        assert!(derive_range(&offsets, 1, 10, "t").unwrap().is_empty());
        assert_eq!(derive_range(&offsets, 2, 10, "t").unwrap(), 3..7);
        assert_eq!(derive_range(&offsets, 3, 10, "t").unwrap(), 7..10);
        assert!(derive_range(&[12], 0, 10, "t").is_err());
    }

    #[test]
    fn test_mesh_triangles_slice_combined_buffer() {
        let file = sample_file();
        assert!(file.mesh_triangles(&file.meshes[0]).is_empty());
        assert_eq!(file.mesh_triangles(&file.meshes[1]).len(), 2);
    }

    #[test]
    fn test_scene_without_models() {
        let file = CsbFile {
            nodes: vec![Node::new(0, 0)],
            ..Default::default()
        };
        let bytes = file.encode(FormatRevision::Current).unwrap();
        assert_eq!(CsbFile::decode(&bytes, FormatRevision::Current).unwrap(), file);
    }
}
