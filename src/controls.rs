use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    Rotate,
    Pan,
}

/// Orbits the camera around `target`. Pointer input accumulates motion and
/// `update` applies it, a `damping_factor` fraction per frame when damping is on.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    // x is azimuth (theta), y is polar (phi)
    spherical_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
    drag: Option<(DragAction, Vec2)>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            drag: None,
        }
    }
}

impl OrbitControls {
    pub fn damped() -> Self {
        Self {
            enable_damping: true,
            ..Default::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn begin_drag(&mut self, action: DragAction, position: Vec2) {
        self.drag = Some((action, position));
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Feeds a pointer position in physical pixels. `viewport_height` scales
    /// the motion so a full-height drag rotates by one turn.
    pub fn drag_to(&mut self, position: Vec2, viewport_height: f32, camera: &PerspectiveCamera) {
        let Some((action, last)) = self.drag else {
            return;
        };
        self.drag = Some((action, position));

        let height = viewport_height.max(1.0);
        let delta = position - last;

        match action {
            DragAction::Rotate => {
                let delta = delta * self.rotate_speed;
                self.rotate_left(TAU * delta.x / height);
                self.rotate_up(TAU * delta.y / height);
            }
            DragAction::Pan => self.pan(delta * self.pan_speed, height, camera),
        }
    }

    /// Positive `steps` move the camera toward the target.
    pub fn zoom(&mut self, steps: f32) {
        let zoom_scale = 0.95_f32.powf(self.zoom_speed * steps.abs());

        if steps > 0.0 {
            self.scale *= zoom_scale;
        } else if steps < 0.0 {
            self.scale /= zoom_scale;
        }
    }

    fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.x -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.y -= angle;
    }

    fn pan(&mut self, delta: Vec2, height: f32, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        let target_distance = offset.length() * (camera.fov_y / 2.0).tan();

        let forward = (camera.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        self.pan_offset -= right * (2.0 * delta.x * target_distance / height);
        self.pan_offset += up * (2.0 * delta.y * target_distance / height);
    }

    /// Applies pending motion to the camera, returns whether it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        theta += self.spherical_delta.x * step;
        phi += self.spherical_delta.y * step;
        phi = phi.clamp(
            self.min_polar_angle.max(EPS),
            self.max_polar_angle.min(PI - EPS),
        );

        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * step;

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let previous_position = camera.position;
        let previous_target = camera.target;
        camera.position = self.target + new_offset;
        camera.target = self.target;

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous_position.distance_squared(camera.position) > EPS
            || previous_target.distance_squared(camera.target) > EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default(), 1.0)
    }

    fn azimuth(camera: &PerspectiveCamera) -> f32 {
        let offset = camera.position - camera.target;
        offset.x.atan2(offset.z)
    }

    #[test]
    fn update_without_input_keeps_the_camera() {
        let mut camera = camera();
        let start = camera.position;
        let mut controls = OrbitControls::damped();

        assert!(!controls.update(&mut camera));
        assert!(camera.position.distance(start) < 1e-5);
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut camera = camera();
        let mut controls = OrbitControls::damped();
        let start = azimuth(&camera);

        controls.begin_drag(DragAction::Rotate, Vec2::ZERO);
        controls.drag_to(Vec2::new(-100.0, 0.0), 1000.0, &camera);
        controls.end_drag();
        let expected = TAU * 100.0 / 1000.0;

        assert!(controls.update(&mut camera));
        let first = azimuth(&camera) - start;
        assert!((first - expected * 0.05).abs() < 1e-4);

        for _ in 0..400 {
            controls.update(&mut camera);
        }
        assert!((azimuth(&camera) - start - expected).abs() < 1e-3);
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        let start = azimuth(&camera);

        controls.begin_drag(DragAction::Rotate, Vec2::ZERO);
        controls.drag_to(Vec2::new(-50.0, 0.0), 1000.0, &camera);
        controls.update(&mut camera);

        assert!((azimuth(&camera) - start - TAU * 0.05).abs() < 1e-4);
    }

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut camera = camera();
        let distance = camera.position.length();
        let mut controls = OrbitControls::default();

        controls.begin_drag(DragAction::Rotate, Vec2::ZERO);
        controls.drag_to(Vec2::new(37.0, -12.0), 800.0, &camera);
        controls.update(&mut camera);

        assert!((camera.position.length() - distance).abs() < 1e-4);
    }

    #[test]
    fn polar_angle_never_passes_the_pole() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();

        controls.begin_drag(DragAction::Rotate, Vec2::ZERO);
        controls.drag_to(Vec2::new(0.0, 5000.0), 500.0, &camera);
        controls.update(&mut camera);

        let offset = camera.position - camera.target;
        assert!(offset.y > 0.0);
        assert!(offset.x.is_finite() && offset.z.is_finite());
    }

    #[test]
    fn zoom_moves_toward_target_and_respects_limits() {
        let mut camera = camera();
        let distance = camera.position.length();
        let mut controls = OrbitControls {
            max_distance: distance * 1.01,
            ..Default::default()
        };

        controls.zoom(1.0);
        controls.update(&mut camera);
        assert!((camera.position.length() - distance * 0.95).abs() < 1e-4);

        controls.zoom(-10.0);
        controls.update(&mut camera);
        assert!((camera.position.length() - distance * 1.01).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_the_target() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();

        controls.begin_drag(DragAction::Pan, Vec2::ZERO);
        controls.drag_to(Vec2::new(100.0, 0.0), 1000.0, &camera);
        controls.update(&mut camera);

        assert!(controls.target.length() > 0.0);
        assert_eq!(camera.target, controls.target);
    }

    #[test]
    fn moves_without_a_drag_are_ignored() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();

        controls.drag_to(Vec2::new(100.0, 100.0), 1000.0, &camera);
        assert!(!controls.update(&mut camera));
    }
}
