//! Scene to collision file conversion

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::exporter::{BOX_PREFIX, MAP_OBJECT_PREFIX, SPHERE_PREFIX};
use super::{narrow, to_triangles, ConvertError, ImportSettings, MaterialCode};
use crate::collision::{BoundingBox, SUB_MODEL_DEFAULT_EXTENT};
use crate::formats::csb::DEFAULT_SPHERE_RADIUS;
use crate::formats::{
    CollisionObject, CsbFile, CtbFile, FileKind, FormatResult, FormatRevision, Mesh, Model, Node,
};
use crate::scene::{IoNode, IoScene};

/// Name of the root inserted above several scene roots or a synthesized tree
pub const COLLISION_ROOT_NAME: &str = "Collision";

/// Children per synthesized group node; the node table narrows child counts
pub const MAX_CHILDREN_PER_NODE: usize = 100;

const GROUP_NODE_PREFIX: &str = "Node_";

/// What a scene node turns into, decided once from its name and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Trigger volume; `name` has the marker prefix stripped
    Trigger {
        /// Display name
        name: String,
        /// Sphere rather than box
        sphere: bool,
    },
    /// Geometry from the scene's mesh arena
    Mesh(usize),
    /// Grouping node without geometry
    Structural,
}

impl NodeKind {
    /// Classify a scene node
    pub fn classify(node: &IoNode) -> Self {
        if let Some(name) = node.name.strip_prefix(SPHERE_PREFIX) {
            Self::Trigger {
                name: name.to_string(),
                sphere: true,
            }
        } else if node.name.starts_with(MAP_OBJECT_PREFIX) {
            let name = node.name.strip_prefix(BOX_PREFIX).unwrap_or(&node.name);
            Self::Trigger {
                name: name.to_string(),
                sphere: false,
            }
        } else if let Some(mesh) = node.mesh {
            Self::Mesh(mesh)
        } else {
            Self::Structural
        }
    }
}

/// Output of [`import_scene`]
#[derive(Debug, Clone, PartialEq)]
pub struct ImportResults {
    /// Collision scene
    pub scene: CsbFile,
    /// Collision table; absent in map-object mode or when there is no geometry
    pub table: Option<CtbFile>,
}

impl ImportResults {
    /// Write `<stem>.csb` and, if present, `<stem>.ctb` into `dir`, with the
    /// envelope suffix when `revision` uses one
    pub fn write_to_dir(
        &self,
        dir: &Path,
        stem: &str,
        revision: FormatRevision,
    ) -> FormatResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        let scene_path = dir.join(revision.file_name(stem, FileKind::Scene));
        self.scene.write_file(&scene_path, revision)?;
        written.push(scene_path);

        if let Some(table) = &self.table {
            let table_path = dir.join(revision.file_name(stem, FileKind::Table));
            table.write_file(&table_path, revision)?;
            written.push(table_path);
        }

        for path in &written {
            log::info!("Wrote {}", path.display());
        }
        Ok(written)
    }
}

/// Convert `scene` into a collision scene.
///
/// A scene without nodes gets a synthesized tree: a root named
/// [`COLLISION_ROOT_NAME`] over groups of at most [`MAX_CHILDREN_PER_NODE`]
/// mesh nodes.
pub fn import_scene(scene: &IoScene, settings: &ImportSettings) -> Result<ImportResults, ConvertError> {
    scene.validate()?;
    let scene = if scene.nodes.is_empty() {
        Cow::Owned(synthesize_tree(scene))
    } else {
        Cow::Borrowed(scene)
    };

    log::info!(
        "Importing scene: {} nodes, {} meshes, {} mode",
        scene.nodes.len(),
        scene.meshes.len(),
        if settings.map_object { "map object" } else { "merged" }
    );

    let mut builder = Builder::new(&scene, settings);
    builder.walk()?;

    let results = if settings.map_object {
        builder.finish_split()?
    } else {
        builder.finish_merged()
    };

    log::info!(
        "Imported {} nodes, {} meshes, {} objects, {} models",
        results.scene.nodes.len(),
        results.scene.meshes.len(),
        results.scene.objects.len(),
        results.scene.models.len()
    );
    Ok(results)
}

/// Root over numbered groups, each holding up to [`MAX_CHILDREN_PER_NODE`] mesh nodes
fn synthesize_tree(scene: &IoScene) -> IoScene {
    let mut scene = scene.clone();
    let root = scene.add_node(IoNode::new(COLLISION_ROOT_NAME));
    let mut group = scene.add_child(root, IoNode::new(format!("{GROUP_NODE_PREFIX}0")));

    for index in 0..scene.meshes.len() {
        if scene.nodes[group].children.len() >= MAX_CHILDREN_PER_NODE {
            let name = format!("{GROUP_NODE_PREFIX}{}", scene.nodes[root].children.len());
            group = scene.add_child(root, IoNode::new(name));
        }
        let node = IoNode {
            mesh: Some(index),
            ..IoNode::new(scene.meshes[index].name.clone())
        };
        scene.add_child(group, node);
    }

    log::debug!(
        "Synthesized node tree: {} groups over {} meshes",
        scene.nodes[root].children.len(),
        scene.meshes.len()
    );
    scene
}

struct Builder<'a> {
    scene: &'a IoScene,
    settings: &'a ImportSettings,
    csb: CsbFile,
    combined: Model,
    /// Scene mesh index to the (node id, scene node index) that first referenced it
    mesh_nodes: HashMap<usize, (u16, usize)>,
}

impl<'a> Builder<'a> {
    fn new(scene: &'a IoScene, settings: &'a ImportSettings) -> Self {
        Self {
            scene,
            settings,
            csb: CsbFile::default(),
            combined: Model::combined(),
            mesh_nodes: HashMap::new(),
        }
    }

    fn push_node(&mut self, child_count: usize) -> Result<u16, ConvertError> {
        let id = narrow::<u16>("node_count", self.csb.nodes.len())?;
        let child_count = narrow::<u8>("child_count", child_count)?;
        self.csb.nodes.push(Node::new(id, child_count));
        Ok(id)
    }

    fn push_empty_mesh(&mut self, name: &str, node_index: u16) -> Result<(), ConvertError> {
        let triangle_start = narrow::<u32>("triangle_count", self.combined.triangles.len())?;
        let vertex_start = narrow::<u32>("vertex_count", self.combined.positions.len())?;
        self.csb
            .meshes
            .push(Mesh::empty(name, node_index, triangle_start, vertex_start));
        Ok(())
    }

    /// Emit the node table in pre-order, classifying each node on the way
    fn walk(&mut self) -> Result<(), ConvertError> {
        let roots = self.scene.roots();
        if roots.len() != 1 {
            let id = self.push_node(roots.len())?;
            self.push_empty_mesh(COLLISION_ROOT_NAME, id)?;
        }

        let scene = self.scene;
        let mut stack: Vec<usize> = roots.into_iter().rev().collect();
        while let Some(index) = stack.pop() {
            let node = &scene.nodes[index];
            let id = self.push_node(node.children.len())?;

            match NodeKind::classify(node) {
                NodeKind::Trigger { name, sphere } => self.add_trigger(node, name, sphere, id),
                NodeKind::Mesh(mesh) => self.add_mesh(mesh, index, id)?,
                NodeKind::Structural => self.push_empty_mesh(&node.name, id)?,
            }

            stack.extend(node.children.iter().rev());
        }
        Ok(())
    }

    fn add_trigger(&mut self, node: &IoNode, name: String, sphere: bool, node_index: u16) {
        let mut object = if sphere {
            let mut radius = node.scale.x;
            if !(radius.is_finite() && radius > 0.0) {
                log::warn!("Sphere '{name}' has no usable scale, using radius {DEFAULT_SPHERE_RADIUS}");
                radius = DEFAULT_SPHERE_RADIUS;
            }
            CollisionObject::sphere(name, node.translation, radius)
        } else {
            CollisionObject::cuboid(name, node.translation, node.scale, node.rotation)
        };

        object.node_index = node_index;
        object.col_flag = node
            .mesh
            .and_then(|m| self.scene.meshes.get(m))
            .and_then(|m| m.first_material())
            .and_then(MaterialCode::parse)
            .map_or(0, |code| code.flag);

        log::debug!("Trigger object '{}' at node {node_index}", object.name);
        self.csb.push_object(object);
    }

    fn add_mesh(&mut self, mesh_index: usize, scene_node: usize, node_index: u16) -> Result<(), ConvertError> {
        let scene = self.scene;
        let mesh = &scene.meshes[mesh_index];
        if self.mesh_nodes.contains_key(&mesh_index) {
            log::warn!("Mesh '{}' referenced again at node {node_index}, converted once", mesh.name);
            return Ok(());
        }
        self.mesh_nodes.insert(mesh_index, (node_index, scene_node));

        if self.settings.map_object {
            return Ok(());
        }

        let setting = self.settings.mesh_setting(mesh);
        let triangle_start = narrow::<u32>("triangle_count", self.combined.triangles.len())?;
        let vertex_start = narrow::<u32>("vertex_count", self.combined.positions.len())?;
        let welded = to_triangles(mesh, vertex_start, triangle_start)?;
        if welded.triangles.is_empty() {
            log::warn!("Mesh '{}' has no usable triangles", mesh.name);
        }

        self.combined.positions.extend(welded.positions);
        self.combined.triangles.extend(welded.triangles);

        let triangle_end = narrow::<u32>("triangle_count", self.combined.triangles.len())?;
        let vertex_end = narrow::<u32>("vertex_count", self.combined.positions.len())?;
        log::debug!(
            "Mesh '{}': {} triangles, {} welded vertices, material {}, flags {}",
            mesh.name,
            triangle_end - triangle_start,
            vertex_end - vertex_start,
            self.settings.game.material_label(setting.material_attribute),
            self.settings.game.describe_flags(setting.col_flag)
        );

        self.csb.meshes.push(Mesh {
            name: mesh.name.clone(),
            material_attribute: setting.material_attribute,
            col_flag: setting.col_flag,
            node_index,
            triangles: triangle_start..triangle_end,
            vertices: vertex_start..vertex_end,
        });
        Ok(())
    }

    fn finish_merged(mut self) -> ImportResults {
        self.combined.compute_bounds();
        self.csb.sub_model_bounds = BoundingBox::uniform(SUB_MODEL_DEFAULT_EXTENT);

        let table = CtbFile::generate(&self.combined, &self.settings.octree);
        self.csb.models.push(self.combined);

        ImportResults {
            scene: self.csb,
            table: (!table.nodes.is_empty()).then_some(table),
        }
    }

    fn finish_split(mut self) -> Result<ImportResults, ConvertError> {
        let combined = std::mem::replace(&mut self.combined, Model::combined());
        self.csb.models.push(combined);

        let scene = self.scene;
        for (index, mesh) in scene.meshes.iter().enumerate() {
            let setting = self.settings.mesh_setting(mesh);
            let welded = to_triangles(mesh, 0, 0)?;
            if welded.triangles.is_empty() {
                log::warn!("Skipping mesh '{}' without usable triangles", mesh.name);
                continue;
            }

            let mut model = Model::new(mesh.name.clone());
            model.col_flag = setting.col_flag;
            model.material_attribute = setting.material_attribute;
            model.positions = welded.positions;
            model.triangles = welded.triangles;
            model.compute_bounds();

            model.node_index = if let Some(&(node_index, scene_node)) = self.mesh_nodes.get(&index) {
                let node = &scene.nodes[scene_node];
                model.translate = node.translation;
                model.rotation = node.rotation;
                node_index
            } else {
                self.push_node(0)?
            };

            log::debug!(
                "Split model '{}': {} triangles at node {}",
                model.name,
                model.triangles.len(),
                model.node_index
            );
            self.csb.models.push(model);
        }

        self.csb.sub_model_bounds =
            BoundingBox::from_positions(self.csb.split_models().iter().flat_map(|m| &m.positions));

        Ok(ImportResults {
            scene: self.csb,
            table: None,
        })
    }
}
