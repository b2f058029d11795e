//! Camera configuration

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Pitch limit in degrees, both up and down
pub const MAX_PITCH_DEGREES: f32 = 80.0;

/// Follow camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Offset from the character at zero yaw/pitch (behind is +Z)
    pub offset: Vec3,
    /// Look sensitivity (degrees per unit of look delta per 1/100 s)
    pub sensitivity: f32,
    /// How quickly the camera catches up with its desired position
    pub follow_sharpness: f32,
    /// Height above the character's feet the camera looks at
    pub look_height: f32,
    /// Initial yaw in degrees
    pub initial_yaw: f32,
    /// Initial pitch in degrees
    pub initial_pitch: f32,
    /// Turn the character to the camera's heading every frame. Unset means
    /// on for the kinematic model and off for the dynamic one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_character_yaw: Option<bool>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.0, 5.0),
            sensitivity: 2.0,
            follow_sharpness: 10.0,
            look_height: 1.5,
            initial_yaw: 0.0,
            initial_pitch: 0.0,
            sync_character_yaw: None,
        }
    }
}
