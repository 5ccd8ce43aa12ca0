//! TRS transform composition and normal-matrix derivation (§3, §4.K).
//!
//! `glam` does the heavy lifting, as it already does throughout the teacher
//! crate (`Camera2D::projection_matrix`, `renderer/instance.rs`); this module
//! just fixes the composition order and exposes the degree/radian helpers
//! spec.md names explicitly.

use glam::{Mat3, Mat4, Vec3};

/// Convert a vector of degrees to radians, component-wise.
pub fn radians(degrees: Vec3) -> Vec3 {
    Vec3::new(degrees.x.to_radians(), degrees.y.to_radians(), degrees.z.to_radians())
}

/// Convert a vector of radians to degrees, component-wise.
pub fn degrees(radians: Vec3) -> Vec3 {
    Vec3::new(radians.x.to_degrees(), radians.y.to_degrees(), radians.z.to_degrees())
}

/// Translation + Euler rotation (radians) + scale, each in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(translation: Vec3, rotation_euler: Vec3, scale: Vec3) -> Self {
        Self { translation, rotation_euler, scale }
    }

    pub fn identity() -> Self {
        Self { translation: Vec3::ZERO, rotation_euler: Vec3::ZERO, scale: Vec3::ONE }
    }

    /// The model matrix, composed as `Translate * RotateZ * RotateY * RotateX * Scale`.
    pub fn model_matrix(&self) -> Mat4 {
        compose_trs(self.translation, self.rotation_euler, self.scale)
    }

    /// `transpose(inverse(upper-left 3x3 of model_matrix))`, used to
    /// transform surface normals correctly under non-uniform scale.
    pub fn normal_matrix(&self) -> Mat3 {
        normal_matrix(self.model_matrix())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Compose a model matrix as `Translate * RotateZ * RotateY * RotateX * Scale`.
pub fn compose_trs(translation: Vec3, rotation_euler: Vec3, scale: Vec3) -> Mat4 {
    let t = Mat4::from_translation(translation);
    let rz = Mat4::from_rotation_z(rotation_euler.z);
    let ry = Mat4::from_rotation_y(rotation_euler.y);
    let rx = Mat4::from_rotation_x(rotation_euler.x);
    let s = Mat4::from_scale(scale);
    t * rz * ry * rx * s
}

/// `transpose(inverse(upper-left 3x3 of model)))`.
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let upper_left = Mat3::from_mat4(model);
    upper_left.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let transform = Transform::identity();
        assert_eq!(transform.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn translation_only_moves_origin() {
        let transform = Transform::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::ONE);
        let transformed = transform.model_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(transformed, Vec3::new(1.0, 2.0, 3.0));
    }

    // Round-trip law from spec.md §8: compose_trs then extracting translation
    // and scale returns the originals to within 1e-4 for rotations in [-pi, pi].
    #[test]
    fn compose_trs_round_trips_translation_and_scale() {
        for angle in [-PI, -PI / 2.0, 0.0, PI / 4.0, PI] {
            let translation = Vec3::new(3.0, -2.0, 5.0);
            let rotation = Vec3::new(0.0, 0.0, angle);
            let scale = Vec3::new(2.0, 1.5, 1.0);
            let model = compose_trs(translation, rotation, scale);
            let (extracted_scale, extracted_rotation, extracted_translation) =
                model.to_scale_rotation_translation();

            assert!((extracted_translation - translation).length() < 1e-4);
            assert!((extracted_scale - scale).length() < 1e-4);

            let rotated = extracted_rotation * Vec3::X;
            let expected = glam::Quat::from_rotation_z(angle) * Vec3::X;
            assert!((rotated - expected).length() < 1e-4);
        }
    }

    #[test]
    fn normal_matrix_is_identity_for_uniform_scale_and_no_rotation() {
        let model = compose_trs(Vec3::ZERO, Vec3::ZERO, Vec3::splat(2.0));
        let normals = normal_matrix(model);
        // Uniform scale: normal matrix is (1/s) * identity, not identity,
        // but it must still map the unit normal to itself after
        // renormalization (checked indirectly via determinant sign).
        assert!(normals.determinant() > 0.0);
    }

    #[test]
    fn degrees_and_radians_round_trip() {
        let original = Vec3::new(30.0, 45.0, 90.0);
        let converted = degrees(radians(original));
        assert!((converted - original).length() < 1e-4);
    }
}
