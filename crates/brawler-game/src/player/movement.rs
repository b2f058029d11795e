//! Movement configuration and the locomotion models

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::MoveIntent;

use super::CharacterState;

/// How the character body is moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocomotionModel {
    /// Explicit translations, self-integrated gravity
    Kinematic,
    /// Solver-simulated body steered by a velocity-tracking force
    Dynamic,
}

/// Movement configuration.
///
/// When read from a file, fields left out take the tuning of the chosen
/// `model` (see [`MovementConfig::for_model`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "MovementFields")]
pub struct MovementConfig {
    /// Integration model
    pub model: LocomotionModel,
    /// Horizontal speed in meters per second
    pub move_speed: f32,
    /// Facing interpolation rate (dynamic model)
    pub rotation_speed: f32,
    /// Jump height factor (kinematic) or upward impulse (dynamic)
    pub jump_force: f32,
    /// Gravity magnitude integrated by the kinematic model
    pub gravity: f32,
    /// Vertical velocity held while grounded so the body stays pressed down
    pub ground_stick_velocity: f32,
    /// Gain of the velocity-tracking force (dynamic model)
    pub velocity_gain: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self::kinematic()
    }
}

impl MovementConfig {
    /// Tuning for the kinematic model
    pub fn kinematic() -> Self {
        Self {
            model: LocomotionModel::Kinematic,
            move_speed: 0.4,
            rotation_speed: 10.0,
            jump_force: 2.0,
            gravity: 20.0,
            ground_stick_velocity: -2.0,
            velocity_gain: 10.0,
        }
    }

    /// Tuning for the dynamic model
    pub fn dynamic() -> Self {
        Self {
            model: LocomotionModel::Dynamic,
            move_speed: 5.0,
            jump_force: 8.0,
            gravity: 9.81,
            ..Self::kinematic()
        }
    }

    /// Preset tuning for `model`
    pub fn for_model(model: LocomotionModel) -> Self {
        match model {
            LocomotionModel::Kinematic => Self::kinematic(),
            LocomotionModel::Dynamic => Self::dynamic(),
        }
    }

    /// Initial vertical speed of a kinematic jump
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * self.jump_force * self.gravity).sqrt()
    }
}

/// On-disk form of [`MovementConfig`]; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MovementFields {
    model: Option<LocomotionModel>,
    move_speed: Option<f32>,
    rotation_speed: Option<f32>,
    jump_force: Option<f32>,
    gravity: Option<f32>,
    ground_stick_velocity: Option<f32>,
    velocity_gain: Option<f32>,
}

impl From<MovementFields> for MovementConfig {
    fn from(fields: MovementFields) -> Self {
        let preset = Self::for_model(fields.model.unwrap_or(LocomotionModel::Kinematic));
        Self {
            model: preset.model,
            move_speed: fields.move_speed.unwrap_or(preset.move_speed),
            rotation_speed: fields.rotation_speed.unwrap_or(preset.rotation_speed),
            jump_force: fields.jump_force.unwrap_or(preset.jump_force),
            gravity: fields.gravity.unwrap_or(preset.gravity),
            ground_stick_velocity: fields
                .ground_stick_velocity
                .unwrap_or(preset.ground_stick_velocity),
            velocity_gain: fields.velocity_gain.unwrap_or(preset.velocity_gain),
        }
    }
}

/// What the body should do this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Move the kinematic body by this translation
    Translate(Vec3),
    /// Drive the dynamic body with a continuous acceleration and turn it
    Drive { acceleration: Vec3, facing: Quat },
    /// Kick the dynamic body
    Impulse(Vec3),
    /// Nothing for the body to apply
    None,
}

/// Turns move intent into body motion according to the configured model
#[derive(Debug, Clone)]
pub struct Locomotion {
    config: MovementConfig,
}

impl Locomotion {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn model(&self) -> LocomotionModel {
        self.config.model
    }

    /// Advance one physics step.
    ///
    /// `camera_forward` and `camera_right` are the flattened camera basis,
    /// used by the dynamic model only.
    pub fn step(
        &self,
        state: &mut CharacterState,
        intent: MoveIntent,
        camera_forward: Vec3,
        camera_right: Vec3,
        dt: f32,
    ) -> Motion {
        match self.config.model {
            LocomotionModel::Kinematic => self.step_kinematic(state, intent, dt),
            LocomotionModel::Dynamic => {
                self.step_dynamic(state, intent, camera_forward, camera_right, dt)
            }
        }
    }

    fn step_kinematic(&self, state: &mut CharacterState, intent: MoveIntent, dt: f32) -> Motion {
        if state.grounded && state.velocity.y < 0.0 {
            state.velocity.y = self.config.ground_stick_velocity;
        }

        let direction = state.right() * intent.x() + state.forward() * intent.y();
        let horizontal = direction * self.config.move_speed;
        state.velocity.x = horizontal.x;
        state.velocity.z = horizontal.z;

        state.velocity.y -= self.config.gravity * dt;

        Motion::Translate(horizontal * dt + Vec3::Y * state.velocity.y * dt)
    }

    fn step_dynamic(
        &self,
        state: &CharacterState,
        intent: MoveIntent,
        camera_forward: Vec3,
        camera_right: Vec3,
        dt: f32,
    ) -> Motion {
        let heading = (camera_forward * intent.y() + camera_right * intent.x()).normalize_or_zero();
        let target_velocity = heading * self.config.move_speed;
        let current = Vec3::new(state.velocity.x, 0.0, state.velocity.z);
        let acceleration = (target_velocity - current) * self.config.velocity_gain;

        let facing = if heading == Vec3::ZERO {
            state.facing
        } else {
            let t = (self.config.rotation_speed * dt).min(1.0);
            state.facing.slerp(look_rotation(heading), t)
        };

        Motion::Drive {
            acceleration,
            facing,
        }
    }

    /// Start a jump if the state allows one.
    ///
    /// Returns `None` when not allowed. The kinematic model sets the vertical
    /// velocity directly and returns `Motion::None`; the dynamic model returns
    /// the impulse for the body.
    pub fn jump(&self, state: &mut CharacterState) -> Option<Motion> {
        match self.config.model {
            LocomotionModel::Kinematic if state.grounded => {
                state.velocity.y = self.config.jump_velocity();
                debug!(velocity = state.velocity.y, "Jump");
                Some(Motion::None)
            }
            LocomotionModel::Dynamic if state.grounded && !state.landing => {
                debug!(impulse = self.config.jump_force, "Jump");
                Some(Motion::Impulse(Vec3::Y * self.config.jump_force))
            }
            _ => None,
        }
    }
}

/// Yaw-only rotation whose forward (-Z) points along `direction`
fn look_rotation(direction: Vec3) -> Quat {
    Quat::from_rotation_y((-direction.x).atan2(-direction.z))
}
