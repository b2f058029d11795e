//! Camera system module
//!
//! Provides the third-person follow camera and the camera-relative movement
//! basis.

mod config;
mod rig;

pub use config::{CameraConfig, MAX_PITCH_DEGREES};
pub use rig::CameraRig;
