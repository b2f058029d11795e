//! Controller errors

use thiserror::Error;

/// A configuration value the controller cannot run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("attackable mask selects no layers")]
    EmptyAttackableMask,

    #[error("ground mask includes the player layer; the probe would hit the character itself")]
    GroundMaskIncludesPlayer,
}
