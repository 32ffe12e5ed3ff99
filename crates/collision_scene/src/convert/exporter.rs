//! Collision file to scene conversion

use super::{ConvertError, MaterialCode};
use crate::collision::Triangle;
use crate::foundation::math::Vec3;
use crate::formats::{CollisionObject, CsbFile, Game, Model, NodeTree, ObjectShape};
use crate::scene::{IoMesh, IoNode, IoPolygon, IoScene, IoVertex};

/// Prefix shared by every trigger node name
pub const MAP_OBJECT_PREFIX: &str = "MAPOBJ_";

/// Node name prefix marking a sphere trigger
pub const SPHERE_PREFIX: &str = "MAPOBJ_SPHERE_";

/// Node name prefix marking a box trigger
pub const BOX_PREFIX: &str = "MAPOBJ_BOX_";

/// Scene node name for a trigger object
pub fn trigger_node_name(object: &CollisionObject) -> String {
    let prefix = if object.is_sphere() { SPHERE_PREFIX } else { BOX_PREFIX };
    format!("{prefix}{}", object.name)
}

/// Convert a collision scene into an interchange scene.
///
/// Nodes keep their flat indices as arena indices. Each triangle becomes
/// three vertices carrying its face normal. Trigger objects get an empty
/// mesh whose material records their collision flag. `game` only names
/// flags and materials in the log output.
pub fn export_scene(csb: &CsbFile, game: Game) -> Result<IoScene, ConvertError> {
    let tree = NodeTree::from_flat(&csb.nodes)?;
    let mut scene = IoScene::new();

    for index in 0..tree.len() {
        let name = csb
            .meshes
            .iter()
            .find(|m| usize::from(m.node_index) == index)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        scene.add_node(IoNode {
            children: tree.children(index).to_vec(),
            ..IoNode::new(name)
        });
    }

    for object in &csb.objects {
        let material = MaterialCode::new(0, object.col_flag).to_string();
        let name = trigger_node_name(object);
        let mesh = scene.add_mesh(flat_mesh(&name, &material, &[]));
        scene.add_material(&material);

        log::debug!(
            "Trigger '{}' at node {}: flags {}",
            object.name,
            object.node_index,
            game.describe_flags(object.col_flag)
        );

        let node = node_mut(&mut scene, object.node_index, &object.name)?;
        node.name = name;
        node.translation = object.point1;
        node.mesh = Some(mesh);
        match object.shape {
            ObjectShape::Sphere { radius } => {
                node.rotation = Vec3::zeros();
                node.scale = Vec3::repeat(radius);
            }
            ObjectShape::Box { size, rotation, .. } => {
                node.rotation = rotation;
                node.scale = size;
            }
        }
    }

    for (index, model) in csb.models.iter().enumerate() {
        if index == 0 && !csb.meshes.is_empty() {
            for mesh in &csb.meshes {
                let triangles = csb.mesh_triangles(mesh);
                if triangles.is_empty() {
                    continue;
                }
                log::debug!(
                    "Mesh '{}': {} triangles, material {}, flags {}",
                    mesh.name,
                    triangles.len(),
                    game.material_label(mesh.material_attribute),
                    game.describe_flags(mesh.col_flag)
                );
                let material = MaterialCode::new(mesh.material_attribute, mesh.col_flag).to_string();
                let io_mesh = scene.add_mesh(flat_mesh(&mesh.name, &material, triangles));
                scene.add_material(&material);
                node_mut(&mut scene, mesh.node_index, &mesh.name)?.mesh = Some(io_mesh);
            }
        } else if !model.triangles.is_empty() {
            log::debug!(
                "Model '{}': {} triangles, material {}, flags {}",
                model.name,
                model.triangles.len(),
                game.material_label(model.material_attribute),
                game.describe_flags(model.col_flag)
            );
            export_model(&mut scene, model)?;
        }
    }

    log::info!(
        "Exported scene: {} nodes, {} meshes, {} materials",
        scene.nodes.len(),
        scene.meshes.len(),
        scene.materials.len()
    );
    Ok(scene)
}

fn export_model(scene: &mut IoScene, model: &Model) -> Result<(), ConvertError> {
    let material = MaterialCode::new(model.material_attribute, model.col_flag).to_string();
    let mesh = scene.add_mesh(flat_mesh(&model.name, &material, &model.triangles));
    scene.add_material(&material);

    let node = node_mut(scene, model.node_index, &model.name)?;
    if node.name.is_empty() {
        node.name = model.name.clone();
    }
    node.mesh = Some(mesh);
    node.translation = model.translate;
    node.rotation = model.rotation;
    node.scale = Vec3::repeat(1.0);
    Ok(())
}

fn node_mut<'a>(scene: &'a mut IoScene, index: u16, owner: &str) -> Result<&'a mut IoNode, ConvertError> {
    let count = scene.nodes.len();
    scene
        .nodes
        .get_mut(usize::from(index))
        .ok_or_else(|| ConvertError::NodeIndexOutOfRange {
            owner: owner.to_string(),
            index: usize::from(index),
            count,
        })
}

/// One polygon, three unshared vertices per triangle
fn flat_mesh(name: &str, material: &str, triangles: &[Triangle]) -> IoMesh {
    let vertices = triangles
        .iter()
        .flat_map(|t| {
            t.vertices.map(|position| IoVertex {
                position,
                normal: t.normal,
            })
        })
        .collect::<Vec<_>>();

    IoMesh {
        name: name.to_string(),
        polygons: vec![IoPolygon {
            material: material.to_string(),
            indices: (0..vertices.len() as u32).collect(),
        }],
        vertices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{Mesh, Node};

    fn small_scene() -> CsbFile {
        let mut combined = Model::combined();
        combined.positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        combined.triangles = vec![Triangle {
            a: 0,
            b: 1,
            c: 2,
            ..Triangle::from_vertices(0, [combined.positions[0], combined.positions[1], combined.positions[2]])
        }];
        combined.compute_bounds();

        let mut csb = CsbFile {
            nodes: vec![Node::new(0, 2), Node::new(1, 0), Node::new(2, 0)],
            meshes: vec![
                Mesh::empty("Root", 0, 0, 0),
                Mesh {
                    name: "Floor".into(),
                    material_attribute: 5,
                    col_flag: 3,
                    node_index: 1,
                    triangles: 0..1,
                    vertices: 0..3,
                },
            ],
            models: vec![combined],
            ..Default::default()
        };
        let mut coin = CollisionObject::sphere("Coin", Vec3::new(1.0, 2.0, 3.0), 0.5);
        coin.node_index = 2;
        coin.col_flag = 8;
        csb.push_object(coin);
        csb
    }

    #[test]
    fn test_nodes_named_from_meshes() {
        let scene = export_scene(&small_scene(), Game::default()).unwrap();
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.nodes[0].name, "Root");
        assert_eq!(scene.nodes[0].children, vec![1, 2]);
        assert_eq!(scene.nodes[1].name, "Floor");
    }

    #[test]
    fn test_triangles_expand_to_three_vertices() {
        let scene = export_scene(&small_scene(), Game::default()).unwrap();
        let floor = &scene.meshes[scene.nodes[1].mesh.unwrap()];
        assert_eq!(floor.vertices.len(), 3);
        assert_eq!(floor.polygons[0].indices, vec![0, 1, 2]);
        assert_eq!(floor.first_material(), Some("MAT5_FLAG3"));
        assert_eq!(floor.vertices[0].normal, floor.vertices[2].normal);
    }

    #[test]
    fn test_trigger_naming() {
        let scene = export_scene(&small_scene(), Game::default()).unwrap();
        let coin = &scene.nodes[2];
        assert_eq!(coin.name, "MAPOBJ_SPHERE_Coin");
        assert_eq!(coin.scale, Vec3::repeat(0.5));
        assert_eq!(coin.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.meshes[coin.mesh.unwrap()].first_material(), Some("MAT0_FLAG8"));
    }

    #[test]
    fn test_object_without_node() {
        let mut csb = small_scene();
        csb.objects[0].node_index = 9;
        let err = export_scene(&csb, Game::default()).unwrap_err();
        assert!(matches!(err, ConvertError::NodeIndexOutOfRange { index: 9, count: 3, .. }));
    }

    #[test]
    fn test_split_model_carries_transform() {
        let mut csb = small_scene();
        let mut split = csb.models[0].clone();
        split.name = "Crate".into();
        split.node_index = 2;
        split.translate = Vec3::new(0.0, 4.0, 0.0);
        csb.objects.clear();
        csb.models.push(split);

        let scene = export_scene(&csb, Game::default()).unwrap();
        let node = &scene.nodes[2];
        assert_eq!(node.name, "Crate");
        assert_eq!(node.translation, Vec3::new(0.0, 4.0, 0.0));
        assert_eq!(scene.meshes[node.mesh.unwrap()].name, "Crate");
    }
}
