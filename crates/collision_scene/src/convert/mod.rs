//! Conversion between interchange scenes and collision files
//!
//! [`import_scene`] turns an [`IoScene`](crate::scene::IoScene) into a
//! [`CsbFile`](crate::formats::CsbFile) plus, in merged mode, its generated
//! [`CtbFile`](crate::formats::CtbFile). [`export_scene`] goes the other way.

mod exporter;
mod importer;
mod material;
mod settings;
mod welding;

pub use exporter::{export_scene, trigger_node_name, BOX_PREFIX, MAP_OBJECT_PREFIX, SPHERE_PREFIX};
pub use importer::{
    import_scene, ImportResults, NodeKind, COLLISION_ROOT_NAME, MAX_CHILDREN_PER_NODE,
};
pub use material::MaterialCode;
pub use settings::{ImportSettings, MeshSetting};
pub use welding::{to_triangles, WeldedMesh};

use thiserror::Error;

use crate::formats::FormatError;
use crate::scene::SceneError;

/// Errors raised while converting scenes
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A polygon refers to a vertex its mesh does not have
    #[error("Mesh '{mesh}': vertex index {index} out of range ({count} vertices)")]
    VertexIndexOutOfRange {
        /// Mesh name
        mesh: String,
        /// Offending index
        index: u32,
        /// Vertex count of the mesh
        count: usize,
    },

    /// A count does not fit the field the collision format gives it
    #[error("Value exceeds fixed capacity for {field}: {value} > {capacity}")]
    CapacityExceeded {
        /// Field being filled
        field: &'static str,
        /// Value that was too large
        value: u64,
        /// Largest value the field can hold
        capacity: u64,
    },

    /// An object, mesh or model refers to a node that does not exist
    #[error("{owner} refers to node {index}, but only {count} nodes exist")]
    NodeIndexOutOfRange {
        /// Name of the referring item
        owner: String,
        /// Offending node index
        index: usize,
        /// Node count
        count: usize,
    },

    /// Codec failure
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Malformed input scene
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Narrow an in-memory count to a fixed-width field
pub(crate) fn narrow<T>(field: &'static str, value: usize) -> Result<T, ConvertError>
where
    T: TryFrom<usize> + Into<u64> + Bounded,
{
    T::try_from(value).map_err(|_| ConvertError::CapacityExceeded {
        field,
        value: value as u64,
        capacity: T::MAX_VALUE.into(),
    })
}

/// Largest value of a fixed-width integer field
pub(crate) trait Bounded: Sized {
    const MAX_VALUE: Self;
}

impl Bounded for u8 {
    const MAX_VALUE: Self = Self::MAX;
}

impl Bounded for u16 {
    const MAX_VALUE: Self = Self::MAX;
}

impl Bounded for u32 {
    const MAX_VALUE: Self = Self::MAX;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow() {
        assert_eq!(narrow::<u16>("node_index", 7).unwrap(), 7);
        let err = narrow::<u8>("child_count", 256).unwrap_err();
        assert!(matches!(err, ConvertError::CapacityExceeded { capacity: 255, .. }));
    }
}
