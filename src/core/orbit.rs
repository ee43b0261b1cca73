use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::controller::{Button, Controller};
use crate::camera::Camera;

const POLAR_EPSILON: f32 = 1e-6;

/// Drag-to-orbit camera controller.
///
/// Left drag swings the camera around `target` on a sphere, right drag pans
/// the target in screen space. Input only accumulates until [`update`]
/// (called once per frame) folds it into the camera. Every update aims the
/// camera at `target`, so a tilt set elsewhere lasts until the next frame.
///
/// [`update`]: OrbitControls::update
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    viewport_height: f32,
    theta_delta: f32,
    phi_delta: f32,
    pan_pixels: Vec2,
}

impl OrbitControls {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            viewport_height: viewport_height.max(1.0),
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_pixels: Vec2::ZERO,
        }
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(1.0);
    }

    /// Rotate by a pointer movement given in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.theta_delta -= TAU * dx * self.rotate_speed / self.viewport_height;
        self.phi_delta -= TAU * dy * self.rotate_speed / self.viewport_height;
    }

    /// Pan by a pointer movement given in pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_pixels += Vec2::new(dx, dy) * self.pan_speed;
    }

    /// Queue whatever drag the controller saw this frame
    pub fn accumulate(&mut self, input: &dyn Controller) {
        if !self.enabled {
            return;
        }

        let (dx, dy) = input.pointer_delta();
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        if input.is_down(Button::MouseLeft) {
            self.rotate(dx, dy);
        } else if input.is_down(Button::MouseRight) {
            self.pan(dx, dy);
        }
    }

    pub fn has_pending_input(&self) -> bool {
        self.theta_delta != 0.0 || self.phi_delta != 0.0 || self.pan_pixels != Vec2::ZERO
    }

    /// Fold pending input into the camera and aim it at the target.
    /// Returns true if a drag was applied.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let moved = self.has_pending_input();
        if moved {
            self.apply_pending(camera);
        }
        camera.look_at(self.target);
        moved
    }

    fn apply_pending(&mut self, camera: &mut Camera) {
        let mut offset = camera.position - self.target;

        if self.pan_pixels != Vec2::ZERO {
            // Scale so the point under the cursor tracks the pointer at the target's depth
            let target_distance = offset.length() * (camera.fov_y / 2.0).tan();
            let scale = 2.0 * target_distance / self.viewport_height;
            let pan = camera.right() * (-self.pan_pixels.x * scale) + camera.up() * (self.pan_pixels.y * scale);
            self.target += pan;
        }

        let radius = offset.length();
        if radius > 0.0 {
            let mut theta = offset.x.atan2(offset.z);
            let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

            theta += self.theta_delta;
            phi = (phi + self.phi_delta)
                .clamp(self.min_polar_angle, self.max_polar_angle)
                .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

            offset = Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
        }

        camera.position = self.target + offset;

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.pan_pixels = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Drag {
        buttons: Vec<Button>,
        delta: (f32, f32),
    }

    impl Controller for Drag {
        fn is_down(&self, button: Button) -> bool {
            self.buttons.contains(&button)
        }

        fn pointer_delta(&self) -> (f32, f32) {
            self.delta
        }
    }

    fn camera_at_30() -> Camera {
        let mut camera = Camera::new(1.0);
        camera.position = Vec3::new(0.0, 0.0, 30.0);
        camera
    }

    #[test]
    fn idle_update_reaims_without_moving() {
        let mut controls = OrbitControls::new(800.0);
        let mut camera = camera_at_30();
        camera.position.y = 0.1;
        camera.rotation.x = 0.1;
        let position = camera.position;

        assert!(!controls.update(&mut camera));
        assert_eq!(camera.position, position);
        let facing = (controls.target - position).normalize();
        assert!(camera.forward().abs_diff_eq(facing, 1e-5));
        assert!(camera.rotation.x < 0.0);
    }

    #[test]
    fn idle_update_from_start_pose_keeps_zero_rotation() {
        let mut controls = OrbitControls::new(800.0);
        let mut camera = camera_at_30();

        controls.update(&mut camera);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 30.0));
        assert!(camera.rotation.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn moving_without_button_is_ignored() {
        let mut controls = OrbitControls::new(800.0);
        controls.accumulate(&Drag {
            buttons: vec![],
            delta: (50.0, 10.0),
        });
        assert!(!controls.has_pending_input());
    }

    #[test]
    fn left_drag_orbits_at_constant_distance() {
        let mut controls = OrbitControls::new(800.0);
        let mut camera = camera_at_30();

        controls.accumulate(&Drag {
            buttons: vec![Button::MouseLeft],
            delta: (200.0, 0.0),
        });
        assert!(controls.update(&mut camera));

        assert!((camera.position.length() - 30.0).abs() < 1e-3);
        // Quarter of the viewport height is a quarter turn the other way
        assert!((camera.position.x - -30.0).abs() < 1e-3);
        let facing = (controls.target - camera.position).normalize();
        assert!(camera.forward().abs_diff_eq(facing, 1e-4));
        assert!(!controls.has_pending_input());
    }

    #[test]
    fn vertical_drag_stops_at_the_pole() {
        let mut controls = OrbitControls::new(100.0);
        let mut camera = camera_at_30();

        controls.rotate(0.0, 1000.0);
        controls.update(&mut camera);

        assert!((camera.position.y - 30.0).abs() < 1e-3);
        assert!(camera.position.is_finite());
        assert!(camera.rotation.is_finite());
    }

    #[test]
    fn right_drag_pans_target_and_camera_together() {
        let mut controls = OrbitControls::new(800.0);
        let mut camera = camera_at_30();

        controls.accumulate(&Drag {
            buttons: vec![Button::MouseRight],
            delta: (40.0, 0.0),
        });
        controls.update(&mut camera);

        assert!(controls.target.x < 0.0);
        assert!((camera.position - controls.target).abs_diff_eq(Vec3::new(0.0, 0.0, 30.0), 1e-3));
    }

    #[test]
    fn disabled_controls_ignore_drags() {
        let mut controls = OrbitControls::new(800.0);
        controls.enabled = false;
        controls.accumulate(&Drag {
            buttons: vec![Button::MouseLeft],
            delta: (10.0, 10.0),
        });
        assert!(!controls.has_pending_input());
    }
}
