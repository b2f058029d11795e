//! Dynamic character body driven by forces and impulses

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::{from_rotation, from_vector, to_rotation, to_vector, CharacterControllerConfig, PhysicsWorld};

/// Mass of the dynamic body; jump impulses are tuned against it
pub const DYNAMIC_CHARACTER_MASS: f32 = 1.0;

/// Character body simulated by the solver: the controller steers it with a
/// continuous acceleration and jumps with an impulse
pub struct DynamicCharacter {
    /// Capsule configuration
    pub config: CharacterControllerConfig,
    /// The rigid body, once spawned
    pub body_handle: Option<RigidBodyHandle>,
    /// The capsule collider, once spawned
    pub collider_handle: Option<ColliderHandle>,
}

impl DynamicCharacter {
    /// Create a new unspawned dynamic character
    pub fn new(config: CharacterControllerConfig) -> Self {
        Self {
            config,
            body_handle: None,
            collider_handle: None,
        }
    }

    /// Spawn the body with its feet at `position`
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position + self.config.center_offset()))
            .lock_rotations()
            .can_sleep(false)
            .build();
        let collider = self.config.capsule().mass(DYNAMIC_CHARACTER_MASS).build();

        let (body_handle, collider_handle) = physics.add_dynamic_body(body, collider);
        self.body_handle = Some(body_handle);
        self.collider_handle = Some(collider_handle);
        body_handle
    }

    fn body<'a>(&self, physics: &'a PhysicsWorld) -> Option<&'a RigidBody> {
        self.body_handle.and_then(|h| physics.get_rigid_body(h))
    }

    fn body_mut<'a>(&self, physics: &'a mut PhysicsWorld) -> Option<&'a mut RigidBody> {
        self.body_handle.and_then(|h| physics.get_rigid_body_mut(h))
    }

    /// Feet position, if spawned
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        self.body(physics)
            .map(|rb| from_vector(rb.translation()) - self.config.center_offset())
    }

    /// Linear velocity, if spawned
    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec3> {
        self.body(physics).map(|rb| from_vector(rb.linvel()))
    }

    /// Current facing, if spawned
    pub fn facing(&self, physics: &PhysicsWorld) -> Option<Quat> {
        self.body(physics).map(|rb| from_rotation(rb.rotation()))
    }

    /// Replace the continuous force with one producing `acceleration`
    /// regardless of mass. Persists across steps until replaced.
    pub fn set_acceleration(&self, physics: &mut PhysicsWorld, acceleration: Vec3) {
        if let Some(rb) = self.body_mut(physics) {
            let force = acceleration * rb.mass();
            rb.reset_forces(true);
            rb.add_force(to_vector(force), true);
        }
    }

    /// Apply an instantaneous impulse
    pub fn apply_impulse(&self, physics: &mut PhysicsWorld, impulse: Vec3) {
        if let Some(rb) = self.body_mut(physics) {
            rb.apply_impulse(to_vector(impulse), true);
        }
    }

    /// Zero the horizontal part of the velocity, keeping vertical motion
    pub fn clear_horizontal_velocity(&self, physics: &mut PhysicsWorld) {
        if let Some(rb) = self.body_mut(physics) {
            let vertical = rb.linvel().y;
            rb.set_linvel(vector![0.0, vertical, 0.0], true);
        }
    }

    /// Rotate the body to face `rotation`
    pub fn set_facing(&self, physics: &mut PhysicsWorld, rotation: Quat) {
        if let Some(rb) = self.body_mut(physics) {
            rb.set_rotation(to_rotation(rotation), true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspawned_body_is_inert() {
        let mut physics = PhysicsWorld::new();
        let character = DynamicCharacter::new(CharacterControllerConfig::default());
        character.apply_impulse(&mut physics, Vec3::Y);
        assert!(character.position(&physics).is_none());
        assert!(character.velocity(&physics).is_none());
    }

    #[test]
    fn test_spawn_places_feet() {
        let mut physics = PhysicsWorld::new();
        let mut character = DynamicCharacter::new(CharacterControllerConfig::default());
        character.spawn(&mut physics, Vec3::new(1.0, 2.0, 3.0));

        let feet = character.position(&physics).unwrap();
        assert!(feet.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
    }

    #[test]
    fn test_clear_horizontal_velocity() {
        let mut physics = PhysicsWorld::new();
        let mut character = DynamicCharacter::new(CharacterControllerConfig::default());
        let handle = character.spawn(&mut physics, Vec3::ZERO);
        physics
            .get_rigid_body_mut(handle)
            .unwrap()
            .set_linvel(vector![3.0, -1.0, 2.0], true);

        character.clear_horizontal_velocity(&mut physics);
        let v = character.velocity(&physics).unwrap();
        assert_eq!(v, Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_set_facing_reads_back() {
        let mut physics = PhysicsWorld::new();
        let mut character = DynamicCharacter::new(CharacterControllerConfig::default());
        assert!(character.facing(&physics).is_none());

        character.spawn(&mut physics, Vec3::ZERO);
        let turned = Quat::from_rotation_y(1.2);
        character.set_facing(&mut physics, turned);
        let facing = character.facing(&physics).unwrap();
        assert!(facing.dot(turned).abs() > 1.0 - 1e-5);
    }
}
