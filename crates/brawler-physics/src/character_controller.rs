//! Kinematic character body using rapier3d's kinematic character controller

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use crate::{to_vector, LayerMask, PhysicsWorld};

/// Character capsule configuration, shared by the kinematic and dynamic bodies
#[derive(Debug, Clone)]
pub struct CharacterControllerConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.4m)
    pub radius: f32,
    /// Maximum slope angle in degrees (default: 45)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
}

impl Default for CharacterControllerConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
            max_slope_angle: 45.0,
            step_height: 0.25,
            skin_width: 0.02,
        }
    }
}

impl CharacterControllerConfig {
    /// Half the length of the capsule's inner segment
    pub(crate) fn half_segment(&self) -> f32 {
        ((self.height - 2.0 * self.radius) / 2.0).max(0.01)
    }

    /// Offset from the feet to the capsule center
    pub(crate) fn center_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.height / 2.0, 0.0)
    }

    /// Capsule collider on the player layer
    pub(crate) fn capsule(&self) -> ColliderBuilder {
        ColliderBuilder::capsule_y(self.half_segment(), self.radius)
            .collision_groups(LayerMask::PLAYER.membership())
            .friction(0.0) // Smooth sliding against walls
            .restitution(0.0)
    }
}

/// Kinematic character body: moved by explicit, non-penetrating translations
pub struct CharacterController {
    /// Configuration
    pub config: CharacterControllerConfig,
    /// Current feet position
    pub position: Vec3,
    /// The collider handle for this character
    pub collider_handle: Option<ColliderHandle>,
    /// Whether the last move ended resting on walkable geometry
    pub grounded: bool,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl CharacterController {
    /// Create a new character controller with default config
    pub fn new() -> Self {
        Self::with_config(CharacterControllerConfig::default())
    }

    /// Create a new character controller with custom config
    pub fn with_config(config: CharacterControllerConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: true,
        });
        // Vertical motion is integrated by the locomotion model; snapping
        // would fight the ground-stick velocity.
        controller.snap_to_ground = None;
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            position: Vec3::ZERO,
            collider_handle: None,
            grounded: false,
            controller,
        }
    }

    /// Spawn the character in the physics world
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> ColliderHandle {
        self.position = position;

        let collider = self
            .config
            .capsule()
            .translation(to_vector(position + self.config.center_offset()))
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        handle
    }

    /// Move the character with collision detection.
    ///
    /// Returns the translation actually applied, which is shorter than the
    /// desired one when the character runs into geometry. Updates
    /// [`grounded`](Self::grounded) from the contacts at the final position.
    pub fn move_character(
        &mut self,
        physics: &mut PhysicsWorld,
        desired_translation: Vec3,
        dt: f32,
    ) -> Vec3 {
        let Some(collider_handle) = self.collider_handle else {
            return Vec3::ZERO;
        };

        let Some(collider) = physics.collider_set.get(collider_handle) else {
            return Vec3::ZERO;
        };

        let shape = collider.shape();
        let center = self.position + self.config.center_offset();
        let current_pos = Isometry::translation(center.x, center.y, center.z);

        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            &physics.query_pipeline,
            shape,
            &current_pos,
            to_vector(desired_translation),
            QueryFilter::default().exclude_collider(collider_handle),
            |_| {},
        );

        let effective = Vec3::new(
            movement.translation.x,
            movement.translation.y,
            movement.translation.z,
        );
        self.position += effective;
        self.grounded = movement.grounded;
        self.sync_collider(physics);
        effective
    }

    fn sync_collider(&self, physics: &mut PhysicsWorld) {
        let Some(handle) = self.collider_handle else {
            return;
        };
        if let Some(collider) = physics.collider_set.get_mut(handle) {
            collider.set_translation(to_vector(self.position + self.config.center_offset()));
        }
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new()
    }
}
