//! Generic scene interchange model
//!
//! A lightweight scene graph: named nodes with Euler transforms, meshes made
//! of triangle-list polygons over a per-mesh vertex array, and materials
//! identified by name. Nodes and meshes live in arenas and refer to each
//! other by index.

mod obj_loader;
mod obj_writer;

pub use obj_loader::ObjLoader;
pub use obj_writer::ObjWriter;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::{Mat4, Transform, Vec3};

/// Scene interchange errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Malformed OBJ statement
    #[error("OBJ line {line}: {message}")]
    Obj {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// An index that points outside its arena
    #[error("{kind} index {index} out of range (count {count})")]
    InvalidReference {
        /// Arena being indexed
        kind: &'static str,
        /// Offending index
        index: usize,
        /// Arena length
        count: usize,
    },
}

/// A vertex of an interchange mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IoVertex {
    /// Position
    pub position: Vec3,
    /// Normal
    pub normal: Vec3,
}

impl IoVertex {
    /// Vertex with an up-facing normal
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            normal: Vec3::y(),
        }
    }
}

/// Triangle list sharing one material
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IoPolygon {
    /// Material name
    pub material: String,
    /// Vertex indices, three per triangle
    pub indices: Vec<u32>,
}

/// Named geometry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IoMesh {
    /// Mesh name
    pub name: String,
    /// Vertex array shared by all polygons
    pub vertices: Vec<IoVertex>,
    /// Polygons
    pub polygons: Vec<IoPolygon>,
}

impl IoMesh {
    /// Empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Material of the first polygon, if it names one
    pub fn first_material(&self) -> Option<&str> {
        self.polygons
            .first()
            .map(|p| p.material.as_str())
            .filter(|m| !m.is_empty())
    }

    /// Number of complete triangles across all polygons
    pub fn triangle_count(&self) -> usize {
        self.polygons.iter().map(|p| p.indices.len() / 3).sum()
    }
}

/// Named material
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IoMaterial {
    /// Material name
    pub name: String,
}

/// Scene graph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoNode {
    /// Node name
    pub name: String,
    /// Translation
    pub translation: Vec3,
    /// Euler rotation in radians
    pub rotation: Vec3,
    /// Scale
    pub scale: Vec3,
    /// Attached mesh
    #[serde(default)]
    pub mesh: Option<usize>,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<usize>,
}

impl Default for IoNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            mesh: None,
            children: Vec::new(),
        }
    }
}

impl IoNode {
    /// Node with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Local transform as a matrix
    pub fn local_matrix(&self) -> Mat4 {
        Transform::from_euler(self.translation, self.rotation, self.scale).to_matrix()
    }
}

/// A whole scene
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IoScene {
    /// Node arena
    #[serde(default)]
    pub nodes: Vec<IoNode>,
    /// Mesh arena
    #[serde(default)]
    pub meshes: Vec<IoMesh>,
    /// Materials
    #[serde(default)]
    pub materials: Vec<IoMaterial>,
}

impl IoScene {
    /// Empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index
    pub fn add_node(&mut self, node: IoNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Add a node under `parent`, returning its index
    pub fn add_child(&mut self, parent: usize, node: IoNode) -> usize {
        let index = self.add_node(node);
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(index);
        }
        index
    }

    /// Add a mesh, returning its index
    pub fn add_mesh(&mut self, mesh: IoMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Register a material unless one with the same name exists
    pub fn add_material(&mut self, name: &str) {
        if !self.materials.iter().any(|m| m.name == name) {
            self.materials.push(IoMaterial { name: name.to_string() });
        }
    }

    /// Parent of every node
    pub fn parents(&self) -> Vec<Option<usize>> {
        let mut parents = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if let Some(slot) = parents.get_mut(child) {
                    *slot = Some(index);
                }
            }
        }
        parents
    }

    /// Nodes without a parent, in arena order
    pub fn roots(&self) -> Vec<usize> {
        self.parents()
            .iter()
            .enumerate()
            .filter_map(|(index, parent)| parent.is_none().then_some(index))
            .collect()
    }

    /// World matrix of `index`, composing parent transforms
    pub fn world_matrix(&self, index: usize) -> Mat4 {
        let parents = self.parents();
        let mut matrix = Mat4::identity();
        let mut current = Some(index);
        let mut visited = HashSet::new();
        while let Some(i) = current {
            if !visited.insert(i) {
                break;
            }
            if let Some(node) = self.nodes.get(i) {
                matrix = node.local_matrix() * matrix;
            }
            current = parents.get(i).copied().flatten();
        }
        matrix
    }

    /// Check that every node, mesh and vertex reference is in range and
    /// that the node graph is a forest
    pub fn validate(&self) -> Result<(), SceneError> {
        let node_count = self.nodes.len();
        let mut seen_as_child = vec![false; node_count];

        for node in &self.nodes {
            if let Some(mesh) = node.mesh {
                if mesh >= self.meshes.len() {
                    return Err(SceneError::InvalidReference {
                        kind: "mesh",
                        index: mesh,
                        count: self.meshes.len(),
                    });
                }
            }
            for &child in &node.children {
                let slot = seen_as_child.get_mut(child).ok_or(SceneError::InvalidReference {
                    kind: "node",
                    index: child,
                    count: node_count,
                })?;
                if *slot {
                    return Err(SceneError::Parse(format!("node {child} has more than one parent")));
                }
                *slot = true;
            }
        }

        if node_count > 0 && seen_as_child.iter().all(|&c| c) {
            return Err(SceneError::Parse("node graph has no root".to_string()));
        }

        for mesh in &self.meshes {
            let vertex_count = mesh.vertices.len();
            for polygon in &mesh.polygons {
                if let Some(&bad) = polygon.indices.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(SceneError::InvalidReference {
                        kind: "vertex",
                        index: bad as usize,
                        count: vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse a RON scene document
    pub fn from_ron_str(text: &str) -> Result<Self, SceneError> {
        let scene: Self = ron::from_str(text).map_err(|e| SceneError::Parse(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Render as a RON scene document
    pub fn to_ron_string(&self) -> Result<String, SceneError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::Serialize(e.to_string()))
    }

    /// Load a RON scene document
    pub fn load_ron(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Save as a RON scene document
    pub fn save_ron(&self, path: &Path) -> Result<(), SceneError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_level_scene() -> IoScene {
        let mut scene = IoScene::new();
        let mesh = scene.add_mesh(IoMesh {
            name: "Floor".into(),
            vertices: vec![
                IoVertex::at(Vec3::new(0.0, 0.0, 0.0)),
                IoVertex::at(Vec3::new(0.0, 0.0, 1.0)),
                IoVertex::at(Vec3::new(1.0, 0.0, 0.0)),
            ],
            polygons: vec![IoPolygon { material: "MAT1_FLAG2".into(), indices: vec![0, 1, 2] }],
        });
        scene.add_material("MAT1_FLAG2");
        let root = scene.add_node(IoNode {
            translation: Vec3::new(10.0, 0.0, 0.0),
            ..IoNode::new("Root")
        });
        scene.add_child(root, IoNode { mesh: Some(mesh), ..IoNode::new("Floor") });
        scene
    }

    #[test]
    fn test_roots_and_parents() {
        let scene = two_level_scene();
        assert_eq!(scene.roots(), vec![0]);
        assert_eq!(scene.parents(), vec![None, Some(0)]);
    }

    #[test]
    fn test_world_matrix_composes_parents() {
        let scene = two_level_scene();
        let p = scene.world_matrix(1).transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 11.0);
    }

    #[test]
    fn test_ron_round_trip() {
        let scene = two_level_scene();
        let text = scene.to_ron_string().unwrap();
        assert_eq!(IoScene::from_ron_str(&text).unwrap(), scene);
    }

    #[test]
    fn test_materials_deduplicated() {
        let mut scene = two_level_scene();
        scene.add_material("MAT1_FLAG2");
        assert_eq!(scene.materials.len(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_references() {
        let mut scene = two_level_scene();
        scene.nodes[1].mesh = Some(7);
        assert!(matches!(scene.validate(), Err(SceneError::InvalidReference { kind: "mesh", .. })));

        let mut scene = two_level_scene();
        scene.meshes[0].polygons[0].indices[2] = 9;
        assert!(matches!(scene.validate(), Err(SceneError::InvalidReference { kind: "vertex", .. })));

        let mut scene = two_level_scene();
        scene.nodes[1].children.push(0);
        assert!(scene.validate().is_err());
    }
}
