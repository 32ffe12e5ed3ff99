//! # Collision Scene
//!
//! Reader, writer and generator for CSB collision scenes and their CTB
//! octree tables.
//!
//! ## Features
//!
//! - **Binary codecs**: both format revisions (big-endian with 32-bit flags,
//!   little-endian with 64-bit flags and a zstd envelope)
//! - **Collision tables**: quad-octree generation over a model's triangles
//! - **Scene conversion**: interchange scenes to and from CSB, with vertex
//!   welding and node-tree synthesis
//! - **Interchange files**: RON scene documents and Wavefront OBJ
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collision_scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scene = ObjLoader::load_obj("level.obj")?;
//!     let settings = ImportSettings::default();
//!     let results = import_scene(&scene, &settings)?;
//!     results.write_to_dir(std::path::Path::new("out"), "level", settings.revision)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod collision;
pub mod spatial;
pub mod formats;
pub mod scene;
pub mod convert;
pub mod config;

#[cfg(test)]
mod tests;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        collision::{BoundingBox, Triangle},
        config::{Config, ConfigError},
        convert::{export_scene, import_scene, ConvertError, ImportResults, ImportSettings, MeshSetting},
        formats::{
            CollisionObject, CsbFile, CtbFile, FileKind, FormatError, FormatRevision, Game, Mesh,
            Model, Node, NodeTree,
        },
        foundation::math::Vec3,
        scene::{IoMesh, IoNode, IoScene, ObjLoader, ObjWriter, SceneError},
        spatial::{Octree, OctreeConfig},
    };
}
