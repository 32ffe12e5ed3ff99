//! Wavefront OBJ writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{IoMesh, IoScene, SceneError};
use crate::foundation::math::{Mat4, Point3};

/// Writes an [`IoScene`] as OBJ
///
/// The hierarchy is flattened: every node that carries a mesh is written in
/// world space as its own `o` group. Meshes no node refers to are written
/// untransformed after them.
pub struct ObjWriter;

impl ObjWriter {
    /// Write `scene` to `path`
    pub fn save_obj<P: AsRef<Path>>(scene: &IoScene, path: P) -> Result<(), SceneError> {
        let mut out = BufWriter::new(File::create(path)?);
        Self::write(scene, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Write `scene` to any writer
    pub fn write<W: Write>(scene: &IoScene, out: &mut W) -> Result<(), SceneError> {
        scene.validate()?;

        let mut referenced = vec![false; scene.meshes.len()];
        let mut base = 1usize;

        for (index, node) in scene.nodes.iter().enumerate() {
            let Some(mesh_index) = node.mesh else { continue };
            referenced[mesh_index] = true;
            let mesh = &scene.meshes[mesh_index];
            let name = if node.name.is_empty() { &mesh.name } else { &node.name };
            base = write_group(out, name, mesh, &scene.world_matrix(index), base)?;
        }

        for (mesh, seen) in scene.meshes.iter().zip(referenced) {
            if !seen {
                base = write_group(out, &mesh.name, mesh, &Mat4::identity(), base)?;
            }
        }
        Ok(())
    }
}

/// Write one group, returning the next free 1-based vertex index
fn write_group<W: Write>(
    out: &mut W,
    name: &str,
    mesh: &IoMesh,
    world: &Mat4,
    base: usize,
) -> Result<usize, SceneError> {
    let normal_matrix = world
        .fixed_view::<3, 3>(0, 0)
        .into_owned()
        .try_inverse()
        .map(|m| m.transpose());

    writeln!(out, "o {name}")?;
    for vertex in &mesh.vertices {
        let p = world.transform_point(&Point3::from(vertex.position));
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for vertex in &mesh.vertices {
        let n = normal_matrix
            .map(|m| m * vertex.normal)
            .and_then(|n| n.try_normalize(f32::EPSILON))
            .unwrap_or(vertex.normal);
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    for polygon in &mesh.polygons {
        if !polygon.material.is_empty() {
            writeln!(out, "usemtl {}", polygon.material)?;
        }
        for face in polygon.indices.chunks_exact(3) {
            let [a, b, c] = [face[0], face[1], face[2]].map(|i| i as usize + base);
            writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
    }

    Ok(base + mesh.vertices.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::{IoNode, IoPolygon, IoVertex, ObjLoader};
    use approx::assert_relative_eq;

    fn triangle_mesh(name: &str, material: &str) -> IoMesh {
        IoMesh {
            name: name.into(),
            vertices: vec![
                IoVertex::at(Vec3::new(0.0, 0.0, 0.0)),
                IoVertex::at(Vec3::new(0.0, 0.0, 1.0)),
                IoVertex::at(Vec3::new(1.0, 0.0, 0.0)),
            ],
            polygons: vec![IoPolygon { material: material.into(), indices: vec![0, 1, 2] }],
        }
    }

    #[test]
    fn test_nodes_are_flattened_to_world_space() {
        let mut scene = IoScene::new();
        let mesh = scene.add_mesh(triangle_mesh("Tri", "MAT1_FLAG0"));
        let root = scene.add_node(IoNode {
            translation: Vec3::new(0.0, 5.0, 0.0),
            ..IoNode::new("Root")
        });
        scene.add_child(root, IoNode { mesh: Some(mesh), ..IoNode::new("Placed") });

        let mut bytes = Vec::new();
        ObjWriter::write(&scene, &mut bytes).unwrap();
        let reread = ObjLoader::parse(bytes.as_slice()).unwrap();

        assert_eq!(reread.meshes.len(), 1);
        assert_eq!(reread.meshes[0].name, "Placed");
        assert_eq!(reread.meshes[0].first_material(), Some("MAT1_FLAG0"));
        assert_relative_eq!(reread.meshes[0].vertices[0].position.y, 5.0);
    }

    #[test]
    fn test_unreferenced_meshes_use_running_offsets() {
        let mut scene = IoScene::new();
        scene.add_mesh(triangle_mesh("A", "MAT0_FLAG0"));
        scene.add_mesh(triangle_mesh("B", "MAT0_FLAG0"));

        let mut bytes = Vec::new();
        ObjWriter::write(&scene, &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("f 4//4 5//5 6//6"));
    }
}
