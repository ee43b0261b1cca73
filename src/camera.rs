use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use crate::types::CameraUniform;

pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Perspective camera looking down its local -Z axis
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// XYZ-ordered Euler angles
    pub rotation: Vec3,
    /// Vertical field of view, radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov_y: FOV_DEGREES.to_radians(),
            aspect,
            near: NEAR_PLANE,
            far: FAR_PLANE,
        }
    }

    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.quaternion(), self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.quaternion() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.quaternion() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.quaternion() * Vec3::Y
    }

    /// Turn so that -Z points at `target`, keeping world Y as up
    pub fn look_at(&mut self, target: Vec3) {
        let mut z = self.position - target;
        if z.length_squared() == 0.0 {
            z = Vec3::Z;
        }
        z = z.normalize();

        let mut x = Vec3::Y.cross(z);
        if x.length_squared() == 0.0 {
            // Looking straight up or down: nudge off the pole
            z.z += 0.0001;
            z = z.normalize();
            x = Vec3::Y.cross(z);
        }
        x = x.normalize();
        let y = z.cross(x);

        let (rx, ry, rz) = Quat::from_mat3(&Mat3::from_cols(x, y, z)).to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(rx, ry, rz);
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: self.position.to_array(),
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = Camera::new(16.0 / 9.0);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!((camera.fov_y.to_degrees() - 75.0).abs() < 1e-4);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(10.0, 5.0, 30.0);
        camera.look_at(Vec3::ZERO);

        let expected = (Vec3::ZERO - camera.position).normalize();
        assert!(camera.forward().abs_diff_eq(expected, 1e-5));
        assert!(camera.right().y.abs() < 1e-5);
    }

    #[test]
    fn look_at_from_directly_above() {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(0.0, 20.0, 0.0);
        camera.look_at(Vec3::ZERO);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Y, 1e-3));
    }

    #[test]
    fn view_projection_maps_target_to_screen_centre() {
        let mut camera = Camera::new(1.5);
        camera.position = Vec3::new(0.0, 0.0, 30.0);

        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn uniform_carries_position() {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(camera.to_uniform().position, [1.0, 2.0, 3.0]);
    }
}
