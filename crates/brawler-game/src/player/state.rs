//! Per-character simulation state

use brawler_core::yaw_degrees;
use glam::{Quat, Vec3};

/// State owned by one controller and mutated only from its frame and
/// physics-step entry points
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterState {
    /// Feet position
    pub position: Vec3,
    /// Yaw-only facing rotation
    pub facing: Quat,
    /// Velocity. The kinematic model integrates `y` itself; the dynamic model
    /// mirrors the body's velocity.
    pub velocity: Vec3,
    /// Standing on walkable ground
    pub grounded: bool,
    /// Landing sequence in progress
    pub landing: bool,
    /// Attack flag raised for the animation graph
    pub attacking: bool,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            facing: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            grounded: true,
            landing: false,
            attacking: false,
        }
    }
}

impl CharacterState {
    /// Facing direction on the ground plane
    pub fn forward(&self) -> Vec3 {
        self.facing * Vec3::NEG_Z
    }

    /// Right of the facing direction on the ground plane
    pub fn right(&self) -> Vec3 {
        self.facing * Vec3::X
    }

    /// Heading in degrees, clockwise from -Z
    pub fn yaw(&self) -> f32 {
        yaw_degrees(self.facing)
    }

    /// Speed ignoring vertical motion
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}
