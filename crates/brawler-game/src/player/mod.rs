//! Player character module
//!
//! Character state, the two locomotion models and the controller tying them
//! to input, camera, ground sensing and combat.

mod controller;
mod movement;
mod state;

pub use controller::ThirdPersonController;
pub use movement::{Locomotion, LocomotionModel, Motion, MovementConfig};
pub use state::CharacterState;
