//! Third-person follow camera with mouse look

use brawler_core::{yaw_rotation, Transform};
use glam::{EulerRot, Quat, Vec2, Vec3};

use super::{CameraConfig, MAX_PITCH_DEGREES};

/// Orbiting follow camera.
///
/// Yaw and pitch are accumulated in degrees. Positive yaw turns right (seen
/// from above), positive pitch raises the camera so it looks down.
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Configuration
    pub config: CameraConfig,
    /// Yaw in degrees
    yaw: f32,
    /// Pitch in degrees, within ±MAX_PITCH_DEGREES
    pitch: f32,
    /// Camera world pose (computed each frame)
    transform: Transform,
    /// Point the camera is looking at
    target: Vec3,
}

impl CameraRig {
    /// Create a camera rig seeded from the configured initial angles
    pub fn new(config: CameraConfig) -> Self {
        let yaw = config.initial_yaw;
        let pitch = config
            .initial_pitch
            .clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
        Self {
            config,
            yaw,
            pitch,
            transform: Transform::default(),
            target: Vec3::ZERO,
        }
    }

    /// Yaw in degrees
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Camera world position
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Camera world pose
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Get the point the camera is looking at
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Yaw-only rotation the character adopts when synced to the camera
    pub fn heading(&self) -> Quat {
        yaw_rotation(self.yaw)
    }

    /// Rotation applied to the configured offset
    pub fn orbit_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            -self.yaw.to_radians(),
            -self.pitch.to_radians(),
            0.0,
        )
    }

    /// Camera forward flattened onto the ground plane
    pub fn flat_forward(&self) -> Vec3 {
        let forward = self.transform.forward();
        let flat = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        if flat == Vec3::ZERO {
            // Looking straight down: fall back to the yaw heading
            self.heading() * Vec3::NEG_Z
        } else {
            flat
        }
    }

    /// Camera right flattened onto the ground plane
    pub fn flat_right(&self) -> Vec3 {
        self.flat_forward().cross(Vec3::Y)
    }

    /// Place the camera at its resting offset from the character, no smoothing
    pub fn place(&mut self, character_position: Vec3) {
        self.transform.position = character_position + self.orbit_rotation() * self.config.offset;
        self.target = character_position + Vec3::Y * self.config.look_height;
        self.transform.look_at(self.target, Vec3::Y);
    }

    /// Accumulate a look delta into yaw and pitch
    pub fn handle_look(&mut self, look_delta: Vec2, dt: f32) {
        let scale = self.config.sensitivity * dt * 100.0;
        self.yaw += look_delta.x * scale;
        self.pitch -= look_delta.y * scale;
        self.pitch = self.pitch.clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
    }

    /// Update the camera (call each frame)
    pub fn update(&mut self, look_delta: Vec2, character_position: Vec3, dt: f32) {
        self.handle_look(look_delta, dt);

        let desired = character_position + self.orbit_rotation() * self.config.offset;
        let t = (self.config.follow_sharpness * dt).clamp(0.0, 1.0);
        self.transform.position = self.transform.position.lerp(desired, t);

        self.target = character_position + Vec3::Y * self.config.look_height;
        self.transform.look_at(self.target, Vec3::Y);
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_rig_creation() {
        let camera = CameraRig::default();
        assert_eq!(camera.yaw(), 0.0);
        assert_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn test_initial_pitch_clamped() {
        let camera = CameraRig::new(CameraConfig {
            initial_pitch: 120.0,
            ..Default::default()
        });
        assert_eq!(camera.pitch(), MAX_PITCH_DEGREES);
    }

    #[test]
    fn test_look_scaling() {
        let mut camera = CameraRig::default();
        // sensitivity 2, dt 0.01 → 2 degrees per unit
        camera.handle_look(Vec2::new(1.0, 0.5), 0.01);
        assert!((camera.yaw() - 2.0).abs() < 1e-5);
        assert!((camera.pitch() + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_never_leaves_limits() {
        let mut camera = CameraRig::default();
        let deltas = [500.0, -3.0, -900.0, 42.0, 0.0, 10_000.0, -10_000.0, 7.5];
        for (i, dy) in deltas.iter().cycle().take(64).enumerate() {
            let dt = 0.001 + (i % 5) as f32 * 0.01;
            camera.update(Vec2::new(1.0, *dy), Vec3::ZERO, dt);
            assert!(camera.pitch() >= -MAX_PITCH_DEGREES);
            assert!(camera.pitch() <= MAX_PITCH_DEGREES);
        }
    }

    #[test]
    fn test_place_and_look_target() {
        let mut camera = CameraRig::default();
        let character = Vec3::new(3.0, 0.0, -2.0);
        camera.place(character);

        assert_eq!(camera.position(), character + Vec3::new(0.0, 2.0, 5.0));
        assert_eq!(camera.target(), character + Vec3::Y * 1.5);
        assert!(camera.flat_forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(camera.flat_right().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_follow_is_smoothed() {
        let mut camera = CameraRig::default();
        camera.place(Vec3::ZERO);

        let moved = Vec3::new(10.0, 0.0, 0.0);
        camera.update(Vec2::ZERO, moved, 0.05);
        let desired = moved + camera.config.offset;
        let start = Vec3::new(0.0, 2.0, 5.0);
        // Halfway with sharpness 10 and dt 0.05
        assert!(camera.position().abs_diff_eq(start.lerp(desired, 0.5), 1e-4));

        // A long frame snaps instead of overshooting
        camera.update(Vec2::ZERO, moved, 1.0);
        assert!(camera.position().abs_diff_eq(desired, 1e-4));
    }

    #[test]
    fn test_yaw_orbits_behind_character() {
        let mut camera = CameraRig::default();
        camera.place(Vec3::ZERO);
        // 90 degrees to the right in one frame
        camera.update(Vec2::new(45.0, 0.0), Vec3::ZERO, 0.01);
        camera.update(Vec2::ZERO, Vec3::ZERO, 1.0);

        assert!((camera.yaw() - 90.0).abs() < 1e-3);
        assert!(camera.position().abs_diff_eq(Vec3::new(-5.0, 2.0, 0.0), 1e-3));
        assert!(camera.flat_forward().abs_diff_eq(Vec3::X, 1e-3));
        assert!(camera.flat_right().abs_diff_eq(Vec3::Z, 1e-3));
        assert!((camera.heading() * Vec3::NEG_Z).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_basis_is_flat_and_orthonormal() {
        let mut camera = CameraRig::default();
        camera.place(Vec3::ZERO);
        camera.update(Vec2::new(13.0, -20.0), Vec3::ZERO, 0.02);

        let forward = camera.flat_forward();
        let right = camera.flat_right();
        assert_eq!(forward.y, 0.0);
        assert!(right.y.abs() < 1e-6);
        assert!((forward.length() - 1.0).abs() < 1e-5);
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!(forward.dot(right).abs() < 1e-5);
    }
}
