//! Triangle extraction with vertex welding
//!
//! Polygons are read three indices at a time. Zero-area and repeated
//! triangles are dropped before any of their corners reach the welded
//! position table, so the table only holds positions that are used.

use std::collections::{HashMap, HashSet};

use super::{narrow, ConvertError};
use crate::collision::Triangle;
use crate::foundation::math::{vec3_key, Vec3};
use crate::scene::IoMesh;

/// Welded geometry of one mesh, ready to append to a model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeldedMesh {
    /// Accepted triangles; indices and ids are already offset
    pub triangles: Vec<Triangle>,
    /// Distinct positions in first-use order
    pub positions: Vec<Vec3>,
}

/// Convert `mesh` to welded triangles.
///
/// Vertex indices are offset by `start_vertex` and triangle ids by
/// `start_triangle`, so several meshes can share one buffer.
pub fn to_triangles(
    mesh: &IoMesh,
    start_vertex: u32,
    start_triangle: u32,
) -> Result<WeldedMesh, ConvertError> {
    let mut welded = WeldedMesh::default();
    let mut position_table: HashMap<[u32; 3], u32> = HashMap::new();
    let mut seen_faces: HashSet<[[u32; 3]; 3]> = HashSet::new();
    let mut skipped = (0usize, 0usize);

    for polygon in &mesh.polygons {
        for face in polygon.indices.chunks_exact(3) {
            let mut vertices = [Vec3::zeros(); 3];
            for (slot, &index) in vertices.iter_mut().zip(face) {
                *slot = mesh
                    .vertices
                    .get(index as usize)
                    .ok_or_else(|| ConvertError::VertexIndexOutOfRange {
                        mesh: mesh.name.clone(),
                        index,
                        count: mesh.vertices.len(),
                    })?
                    .position;
            }

            let id = start_triangle + narrow::<u32>("triangle_count", welded.triangles.len())?;
            let mut triangle = Triangle::from_vertices(id, vertices);
            if triangle.is_degenerate() {
                skipped.0 += 1;
                continue;
            }
            if !seen_faces.insert(vertices.map(|v| vec3_key(&v))) {
                skipped.1 += 1;
                continue;
            }

            let mut corners = [0u32; 3];
            for (corner, position) in corners.iter_mut().zip(&vertices) {
                let next = narrow::<u32>("vertex_count", welded.positions.len())?;
                let local = *position_table.entry(vec3_key(position)).or_insert_with(|| {
                    welded.positions.push(*position);
                    next
                });
                *corner = start_vertex + local;
            }
            [triangle.a, triangle.b, triangle.c] = corners;
            welded.triangles.push(triangle);
        }
    }

    if skipped != (0, 0) {
        log::debug!(
            "Mesh '{}': dropped {} degenerate and {} duplicate triangles",
            mesh.name,
            skipped.0,
            skipped.1
        );
    }
    Ok(welded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{IoPolygon, IoVertex};

    fn mesh(positions: &[[f32; 3]], indices: Vec<u32>) -> IoMesh {
        IoMesh {
            name: "Test".into(),
            vertices: positions
                .iter()
                .map(|p| IoVertex::at(Vec3::new(p[0], p[1], p[2])))
                .collect(),
            polygons: vec![IoPolygon { material: String::new(), indices }],
        }
    }

    #[test]
    fn test_quad_welds_to_four_positions() {
        // two triangles sharing an edge, every corner duplicated
        let quad = mesh(
            &[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
            vec![0, 1, 2, 3, 4, 5],
        );
        let welded = to_triangles(&quad, 0, 0).unwrap();
        assert_eq!(welded.positions.len(), 4);
        assert_eq!(welded.triangles.len(), 2);
        assert_eq!(welded.triangles[1].indices(), [0, 2, 3]);
        assert_eq!(welded.triangles[1].id, 1);
    }

    #[test]
    fn test_offsets_apply() {
        let tri = mesh(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]], vec![0, 1, 2]);
        let welded = to_triangles(&tri, 10, 4).unwrap();
        assert_eq!(welded.triangles[0].indices(), [10, 11, 12]);
        assert_eq!(welded.triangles[0].id, 4);
    }

    #[test]
    fn test_degenerate_triangles_never_weld() {
        let m = mesh(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 5.0], [0.0, 0.0, 6.0], [1.0, 0.0, 5.0]],
            vec![0, 1, 2, 3, 4, 5],
        );
        let welded = to_triangles(&m, 0, 0).unwrap();
        assert_eq!(welded.triangles.len(), 1);
        assert_eq!(welded.positions.len(), 3);
        assert_eq!(welded.triangles[0].id, 0);
    }

    #[test]
    fn test_duplicate_triangle_first_wins() {
        let m = mesh(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]], vec![0, 1, 2, 0, 1, 2, 1, 2, 0]);
        let welded = to_triangles(&m, 0, 0).unwrap();
        // same corners in another order is a different face
        assert_eq!(welded.triangles.len(), 2);
    }

    #[test]
    fn test_bad_index() {
        let m = mesh(&[[0.0, 0.0, 0.0]], vec![0, 0, 3]);
        let err = to_triangles(&m, 0, 0).unwrap_err();
        assert!(matches!(err, ConvertError::VertexIndexOutOfRange { index: 3, count: 1, .. }));
    }
}
