//! Scene import scenarios checked against the collision data they produce

use crate::convert::{import_scene, ImportSettings, COLLISION_ROOT_NAME};
use crate::formats::FormatRevision;
use crate::foundation::math::Vec3;
use crate::scene::{IoMesh, IoNode, IoPolygon, IoScene, IoVertex, ObjLoader};

/// Unit quad on the XZ plane as two triangles with unshared corners
pub(super) fn quad_mesh(name: &str, material: &str, offset: Vec3) -> IoMesh {
    let corners = [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 0.0),
    ];
    IoMesh {
        name: name.into(),
        vertices: corners.iter().map(|&p| IoVertex::at(p + offset)).collect(),
        polygons: vec![IoPolygon {
            material: material.into(),
            indices: (0..6).collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_with_material_code() {
        let mut scene = IoScene::new();
        let mesh = scene.add_mesh(quad_mesh("Quad", "MAT5_FLAG3", Vec3::zeros()));
        scene.add_node(IoNode { mesh: Some(mesh), ..IoNode::new("Quad") });

        let results = import_scene(&scene, &ImportSettings::default()).unwrap();
        let csb = &results.scene;

        assert_eq!(csb.meshes.len(), 1);
        let quad = &csb.meshes[0];
        assert_eq!(quad.material_attribute, 5);
        assert_eq!(quad.col_flag, 3);
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.triangle_count(), 2);

        let combined = csb.combined_model().unwrap();
        assert!(combined.is_combined());
        assert_eq!(combined.positions.len(), 4);

        let table = results.table.unwrap();
        assert_eq!(table.root().unwrap().triangle_indices, vec![0, 1]);
    }

    #[test]
    fn test_nodeless_scene_is_synthesized() {
        let mut scene = IoScene::new();
        scene.add_mesh(quad_mesh("A", "MAT1", Vec3::zeros()));
        scene.add_mesh(quad_mesh("B", "FLAG2", Vec3::new(3.0, 0.0, 0.0)));

        let results = import_scene(&scene, &ImportSettings::default()).unwrap();
        let csb = &results.scene;

        // Collision -> Node_0 -> { A, B }
        let counts: Vec<u8> = csb.nodes.iter().map(|n| n.child_count).collect();
        assert_eq!(counts, vec![1, 2, 0, 0]);
        let names: Vec<&str> = csb.meshes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![COLLISION_ROOT_NAME, "Node_0", "A", "B"]);

        let b = &csb.meshes[3];
        assert_eq!((b.material_attribute, b.col_flag), (0, 2));
        assert_eq!(b.triangles, 2..4);
        assert_eq!(b.vertices, 4..8);
        assert_eq!(csb.combined_model().unwrap().triangles[2].a, 4);
    }

    #[test]
    fn test_merged_bounds_and_sub_model_default() {
        let mut scene = IoScene::new();
        scene.add_mesh(quad_mesh("A", "", Vec3::new(-2.0, 1.0, 0.0)));

        let results = import_scene(&scene, &ImportSettings::default()).unwrap();
        let combined = results.scene.combined_model().unwrap();
        assert_eq!(combined.bounds.min, Vec3::new(-2.0, 1.0, 0.0));
        assert_eq!(combined.bounds.max, Vec3::new(-1.0, 1.0, 1.0));
        assert_eq!(results.scene.sub_model_bounds.max, Vec3::repeat(999_999.0));
    }

    #[test]
    fn test_split_mode() {
        let mut scene = IoScene::new();
        let a = scene.add_mesh(quad_mesh("A", "MAT4_FLAG1", Vec3::zeros()));
        scene.add_mesh(quad_mesh("Loose", "", Vec3::new(0.0, 5.0, 0.0)));
        scene.add_node(IoNode {
            mesh: Some(a),
            translation: Vec3::new(2.0, 0.0, 0.0),
            ..IoNode::new("A")
        });

        let settings = ImportSettings { map_object: true, ..Default::default() };
        let results = import_scene(&scene, &settings).unwrap();
        let csb = &results.scene;

        assert!(results.table.is_none());
        assert!(csb.models[0].is_combined());
        assert!(csb.models[0].triangles.is_empty());

        let split = csb.split_models();
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].name, "A");
        assert_eq!((split[0].material_attribute, split[0].col_flag), (4, 1));
        assert_eq!(split[0].node_index, 0);
        assert_eq!(split[0].translate, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(split[0].positions.len(), 4);

        // unreferenced mesh gets a node of its own after the tree
        assert_eq!(split[1].node_index, 1);
        assert_eq!(csb.nodes.len(), 2);
        assert_eq!(csb.nodes[1].child_count, 0);

        assert_eq!(csb.sub_model_bounds.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(csb.sub_model_bounds.max, Vec3::new(1.0, 5.0, 1.0));
    }

    #[test]
    fn test_degenerate_only_mesh_yields_no_table() {
        let mut scene = IoScene::new();
        scene.add_mesh(IoMesh {
            name: "Line".into(),
            vertices: vec![
                IoVertex::at(Vec3::new(0.0, 0.0, 0.0)),
                IoVertex::at(Vec3::new(1.0, 0.0, 0.0)),
                IoVertex::at(Vec3::new(2.0, 0.0, 0.0)),
            ],
            polygons: vec![IoPolygon { material: String::new(), indices: vec![0, 1, 2] }],
        });

        let results = import_scene(&scene, &ImportSettings::default()).unwrap();
        assert!(results.table.is_none());
        assert!(results.scene.meshes[2].triangles.is_empty());
    }

    #[test]
    fn test_obj_to_files_and_back() {
        let obj = "\
v 0 0 0
v 0 0 1
v 1 0 1
v 1 0 0
o Floor
usemtl MAT2_FLAG6
f 1 2 3 4
";
        let scene = ObjLoader::parse(obj.as_bytes()).unwrap();
        let results = import_scene(&scene, &ImportSettings::default()).unwrap();

        let dir = std::env::temp_dir().join(format!("csb_end_to_end_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        for revision in [FormatRevision::Legacy, FormatRevision::Current] {
            let written = results.write_to_dir(&dir, "floor", revision).unwrap();
            assert_eq!(written.len(), 2);

            let csb_path = &written[0];
            let detected = FormatRevision::from_path(csb_path).unwrap_or(FormatRevision::Legacy);
            assert_eq!(detected, revision);

            let decoded = crate::formats::CsbFile::read_file(csb_path, detected).unwrap();
            assert_eq!(decoded, results.scene);
            let table = crate::formats::CtbFile::read_file(&written[1], detected).unwrap();
            assert_eq!(Some(table), results.table);
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
