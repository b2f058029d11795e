//! Brawler Core - Core types and utilities
//!
//! This crate provides the foundational types shared by the controller crates:
//! - Mathematical primitives (re-exported from glam)
//! - Transform for character and camera poses
//! - Frame/step clock and explicit countdown timers

pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{Countdown, GameTime, TimeConfig, TimeConfigError};
pub use types::{yaw_degrees, yaw_rotation, Transform};
