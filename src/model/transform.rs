use glam::{Mat3, Mat4, Vec3};

/// Placement of one entity. Rotation holds Euler angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Euler angles (degrees, X then Y then Z as composed by `model_matrix`)
    /// equivalent to rotating `angle_deg` about `axis`.
    pub fn euler_from_axis_angle(axis: Vec3, angle_deg: f32) -> Vec3 {
        let m = Mat3::from_axis_angle(axis.normalize(), angle_deg.to_radians());
        let sy = m.z_axis.x.clamp(-1.0, 1.0);
        let y = sy.asin();
        let x = (-m.z_axis.y).atan2(m.z_axis.z);
        let z = (-m.y_axis.x).atan2(m.x_axis.x);
        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// T * Rx * Ry * Rz * S
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_scale(self.scale)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matrix_composition_order() {
        let t = Transform::default()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Vec3::new(0.0, 90.0, 0.0))
            .with_scale(Vec3::splat(2.0));
        let p = t.model_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 1.0)).length() < 1e-5, "got {p:?}");
    }

    #[test]
    fn test_euler_from_axis_angle_matches_rotation() {
        let axis = Vec3::new(1.0, 0.3, 0.5);
        for step in 0..10 {
            let angle = 20.0 * step as f32;
            let t = Transform::default().with_rotation(Transform::euler_from_axis_angle(axis, angle));
            let expected = Mat4::from_axis_angle(axis.normalize(), angle.to_radians());
            assert!(
                t.model_matrix().abs_diff_eq(expected, 1e-4),
                "rotation of {angle} degrees does not match"
            );
        }
    }

    #[test]
    fn test_default_is_identity() {
        assert_eq!(Transform::default().model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut t = Transform::default()
            .with_position(Vec3::splat(4.0))
            .with_rotation(Vec3::new(10.0, 20.0, 30.0))
            .with_scale(Vec3::splat(0.2));
        t.reset();
        assert_eq!(t, Transform::default());
    }

    #[test]
    fn test_rotation_applies_z_before_x() {
        // Rz(90) turns +X into +Y, then Rx(90) turns +Y into +Z
        let t = Transform::default().with_rotation(Vec3::new(90.0, 0.0, 90.0));
        let p = t.model_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Z).length() < 1e-5, "got {p:?}");
    }
}
