//! Brawler Game - Third-person character controller
//!
//! Input mapping, ground sensing, kinematic and dynamic locomotion, the
//! follow camera, melee attacks and animation signaling, tied together by
//! [`ThirdPersonController`].

pub mod animation;
pub mod camera;
pub mod combat;
pub mod config;
pub mod error;
pub mod ground;
pub mod input;
pub mod player;

pub use animation::{AnimationParameters, AnimationSignals, AnimationSink, AnimationValue};
pub use camera::{CameraConfig, CameraRig};
pub use combat::{AttackKind, AttackProfile, HitResult, MeleeResolver};
pub use config::ControllerConfig;
pub use error::ConfigError;
pub use ground::{GroundConfig, GroundProbe, GroundSensor, GroundTransition};
pub use input::{InputAction, InputBindings, InputHandler, InputState, MoveIntent};
pub use player::{
    CharacterState, Locomotion, LocomotionModel, Motion, MovementConfig, ThirdPersonController,
};
