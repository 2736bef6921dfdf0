//! Orbit camera with damped controls.

use glam::{Mat4, Vec3};

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;
const PITCH_LIMIT: f32 = 1.5;

/// Camera orbiting a target point.
///
/// Input adds to a velocity that [`update`](Self::update) applies a fraction
/// of each frame and then decays, so the view keeps gliding briefly after
/// the mouse is released.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    /// Fraction of the pending motion applied per frame.
    pub damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
}

impl OrbitCamera {
    /// Camera at `(3, 3, 3)` looking at the origin.
    pub fn new(aspect: f32) -> Self {
        Self::looking_from(Vec3::splat(3.0), Vec3::ZERO, aspect)
    }

    /// Camera at `eye` orbiting `target`.
    pub fn looking_from(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(MIN_DISTANCE);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self {
            yaw,
            pitch,
            distance,
            target,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            aspect,
            damping: 0.05,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Queue an orbit by a mouse drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * 0.005;
        self.pitch_velocity += dy * 0.005;
    }

    /// Queue a zoom. Positive values move closer.
    pub fn zoom(&mut self, amount: f32) {
        self.zoom_velocity += amount;
    }

    /// Apply one frame of damped motion.
    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity * self.damping;
        self.pitch = (self.pitch + self.pitch_velocity * self.damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance - self.zoom_velocity * self.damping).clamp(MIN_DISTANCE, MAX_DISTANCE);

        let decay = 1.0 - self.damping;
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_three_three_three() {
        let camera = OrbitCamera::new(1.0);
        assert!(camera.position().abs_diff_eq(Vec3::splat(3.0), 1e-4));
    }

    #[test]
    fn test_damped_rotation_converges_to_full_drag() {
        let mut camera = OrbitCamera::new(1.0);
        let start = camera.yaw;
        camera.rotate(100.0, 0.0);
        for _ in 0..1000 {
            camera.update();
        }
        assert!((camera.yaw - (start - 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_motion_continues_after_input() {
        let mut camera = OrbitCamera::new(1.0);
        camera.rotate(100.0, 0.0);
        camera.update();
        let after_one = camera.yaw;
        camera.update();
        assert!(camera.yaw < after_one);
    }

    #[test]
    fn test_pitch_and_distance_clamped() {
        let mut camera = OrbitCamera::new(1.0);
        camera.rotate(0.0, 1.0e5);
        camera.zoom(1.0e5);
        for _ in 0..100 {
            camera.update();
        }
        assert!(camera.pitch <= PITCH_LIMIT);
        assert!(camera.distance >= MIN_DISTANCE);
    }

    #[test]
    fn test_set_viewport_ignores_zero() {
        let mut camera = OrbitCamera::new(2.0);
        camera.set_viewport(0, 600);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(400, 400);
        assert_eq!(camera.aspect, 1.0);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = OrbitCamera::new(1.5);
        let clip = camera.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
