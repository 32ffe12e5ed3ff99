//! Math utilities and types
//!
//! Thin aliases over `nalgebra` so the rest of the crate speaks in `Vec3`
//! and `Mat4`, plus the transform used to flatten scene nodes.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build a transform from translation, XYZ Euler angles in radians, and scale
    pub fn from_euler(position: Vec3, euler: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::from_euler_angles(euler.x, euler.y, euler.z),
            scale,
        }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Bit pattern of a vector, with negative zero folded into positive zero.
///
/// Used as an exact hash key; two positions weld only if every component
/// compares equal.
pub fn vec3_key(v: &Vec3) -> [u32; 3] {
    let bits = |f: f32| if f == 0.0 { 0 } else { f.to_bits() };
    [bits(v.x), bits(v.y), bits(v.z)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec3_key_folds_negative_zero() {
        assert_eq!(vec3_key(&Vec3::new(-0.0, 1.0, 0.0)), vec3_key(&Vec3::new(0.0, 1.0, -0.0)));
        assert_ne!(vec3_key(&Vec3::new(1.0, 1.0, 1.0)), vec3_key(&Vec3::new(1.0, 1.0, 1.000_001)));
    }

    #[test]
    fn test_transform_matrix_applies_scale_then_translation() {
        let transform = Transform::from_euler(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let p = transform.to_matrix().transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 2.0);
    }
}
