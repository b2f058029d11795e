//! Core types shared by the controller crates

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform representing a position and rotation in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate so that `forward()` points at `target`.
    ///
    /// Leaves the rotation untouched when the target coincides with the
    /// position or lies exactly along `up`.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        let right = forward.cross(up).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return;
        }
        let up = right.cross(forward);

        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward));
    }
}

/// Rotation about the world Y axis for a heading in degrees.
///
/// Headings grow clockwise seen from above: 0 faces -Z, 90 faces +X.
pub fn yaw_rotation(yaw_degrees: f32) -> Quat {
    Quat::from_rotation_y(-yaw_degrees.to_radians())
}

/// Heading in degrees of a rotation's forward vector projected on the ground.
pub fn yaw_degrees(rotation: Quat) -> f32 {
    let forward = rotation * -Vec3::Z;
    forward.x.atan2(-forward.z).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_axes() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(transform.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(transform.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(transform.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_look_at_points_forward() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 2.0, 5.0));
        let target = Vec3::new(0.0, 1.5, 0.0);
        transform.look_at(target, Vec3::Y);

        let expected = (target - transform.position).normalize();
        assert!(transform.forward().abs_diff_eq(expected, 1e-5));
        assert!(transform.right().y.abs() < 1e-5);
    }

    #[test]
    fn test_yaw_round_trip() {
        let forward = yaw_rotation(90.0) * -Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5));
        assert!((yaw_degrees(yaw_rotation(-45.0)) + 45.0).abs() < 1e-3);
    }
}
