use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    // Kept as given so angles outside the canonical Euler range survive.
    euler: Vec3,
    scale: f32,

    world_matrix: Mat4,
    normal_matrix: Mat4,
    dirty: bool,
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat, scale: f32) -> Self {
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        Self::with_euler(translation, rotation, Vec3::new(x, y, z), scale)
    }

    fn with_euler(translation: Vec3, rotation: Quat, euler: Vec3, scale: f32) -> Self {
        let mut transform = Self {
            translation,
            rotation,
            euler,
            scale,
            world_matrix: Mat4::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
            dirty: true,
        };
        transform.update_matrices();
        transform
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY, 1.0)
    }

    /// Euler angles applied in X, then Y, then Z order.
    pub fn from_euler(translation: Vec3, euler: Vec3, scale: f32) -> Self {
        Self::with_euler(
            translation,
            Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z),
            euler,
            scale,
        )
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn euler(&self) -> Vec3 {
        self.euler
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub fn normal_matrix(&self) -> &Mat4 {
        &self.normal_matrix
    }

    /// Recomputes the cached matrices if anything changed, returns whether it did.
    pub fn update_matrices(&mut self) -> bool {
        if !self.dirty {
            return false;
        }

        self.world_matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.translation,
        );

        // A zero scale collapses the mesh to a point; its normals never reach the screen.
        self.normal_matrix = if self.world_matrix.determinant().abs() > f32::EPSILON {
            self.world_matrix.inverse().transpose()
        } else {
            Mat4::from_quat(self.rotation)
        };

        self.dirty = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn world_matrix_applies_scale_rotation_translation() {
        let transform = Transform::from_euler(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, FRAC_PI_2, 0.0), 2.0);
        let point = transform.world_matrix().transform_point3(Vec3::X);

        assert!((point - Vec3::new(1.0, 2.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn euler_angles_are_kept_as_given() {
        let transform = Transform::from_euler(Vec3::ZERO, Vec3::new(3.0, 2.5, 0.0), 1.0);
        assert_eq!(transform.euler(), Vec3::new(3.0, 2.5, 0.0));

        let derived = Transform::new(Vec3::ZERO, Quat::from_rotation_y(1.1), 1.0);
        assert!((derived.euler() - Vec3::new(0.0, 1.1, 0.0)).length() < 1e-5);
    }

    #[test]
    fn zero_scale_keeps_normal_matrix_finite() {
        let transform = Transform::new(Vec3::ONE, Quat::from_rotation_x(0.3), 0.0);

        assert!(transform.normal_matrix().is_finite());
        assert!(transform.world_matrix().is_finite());
    }

    #[test]
    fn matrices_update_only_when_dirty() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        assert!(!transform.update_matrices());

        transform.set_translation(Vec3::Y);
        assert!(transform.is_dirty());
        assert!(transform.update_matrices());
        assert_eq!(transform.world_matrix().w_axis.truncate(), Vec3::Y);
    }
}
