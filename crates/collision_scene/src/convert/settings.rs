//! Import settings

use serde::{Deserialize, Serialize};

use super::MaterialCode;
use crate::config::Config;
use crate::formats::{FormatRevision, Game};
use crate::scene::IoMesh;
use crate::spatial::OctreeConfig;

/// Collision attributes for one named mesh
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeshSetting {
    /// Mesh name the override applies to
    pub name: String,
    /// Collision flag bitmask
    #[serde(default)]
    pub col_flag: u64,
    /// Surface material id
    #[serde(default)]
    pub material_attribute: u32,
}

/// Options controlling [`import_scene`](super::import_scene)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Store every mesh as its own model instead of one shared buffer.
    /// No collision table is generated in this mode.
    pub map_object: bool,
    /// Revision used when writing the results
    pub revision: FormatRevision,
    /// Game whose tables name flags and materials in logs
    pub game: Game,
    /// Collision table generation parameters
    pub octree: OctreeConfig,
    /// Per-mesh overrides
    pub meshes: Vec<MeshSetting>,
}

impl Config for ImportSettings {}

impl ImportSettings {
    /// Settings for `mesh`: an explicit override, else its first material
    /// name, else zeros
    pub fn mesh_setting(&self, mesh: &IoMesh) -> MeshSetting {
        if let Some(setting) = self.meshes.iter().find(|s| s.name == mesh.name) {
            return setting.clone();
        }

        let code = mesh
            .first_material()
            .and_then(MaterialCode::parse)
            .unwrap_or_default();
        MeshSetting {
            name: mesh.name.clone(),
            col_flag: code.flag,
            material_attribute: code.attribute,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::IoPolygon;
    use std::path::Path;

    fn mesh(name: &str, material: &str) -> IoMesh {
        IoMesh {
            name: name.into(),
            vertices: vec![],
            polygons: vec![IoPolygon { material: material.into(), indices: vec![] }],
        }
    }

    #[test]
    fn test_lookup_order() {
        let settings = ImportSettings {
            meshes: vec![MeshSetting { name: "Lava".into(), col_flag: 64, material_attribute: 9 }],
            ..Default::default()
        };

        let lava = settings.mesh_setting(&mesh("Lava", "MAT1_FLAG1"));
        assert_eq!((lava.material_attribute, lava.col_flag), (9, 64));

        let floor = settings.mesh_setting(&mesh("Floor", "MAT5_FLAG3"));
        assert_eq!((floor.material_attribute, floor.col_flag), (5, 3));

        let plain = settings.mesh_setting(&mesh("Rock", "Stone"));
        assert_eq!((plain.material_attribute, plain.col_flag), (0, 0));
    }

    #[test]
    fn test_partial_toml() {
        let settings: ImportSettings = toml::from_str(
            "map_object = true\n\n[[meshes]]\nname = \"Water\"\ncol_flag = 4\n",
        )
        .unwrap();
        assert!(settings.map_object);
        assert_eq!(settings.revision, FormatRevision::Current);
        assert_eq!(settings.game, Game::Ttyd);
        assert_eq!(settings.octree.max_triangles_per_node, 10);
        assert_eq!(settings.meshes[0].material_attribute, 0);
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("csb_import_settings_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("import.ron");

        let settings = ImportSettings {
            revision: FormatRevision::Legacy,
            game: Game::ColorSplash,
            meshes: vec![MeshSetting { name: "Ice".into(), col_flag: 2, material_attribute: 3 }],
            ..Default::default()
        };
        settings.save_to_file(&path).unwrap();
        assert_eq!(ImportSettings::load_from_file(Path::new(&path)).unwrap(), settings);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
