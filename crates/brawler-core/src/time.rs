//! Time system
//!
//! Handles frame delta time, the fixed physics timestep accumulator, and
//! explicit countdown timers used in place of suspended routines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for physics (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 50.0,
            max_delta_time: 0.25,
        }
    }
}

/// A [`TimeConfig`] value the clock cannot run with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeConfigError {
    #[error("time.{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("time.time_scale must be non-negative and finite, got {0}")]
    BadTimeScale(f32),
}

impl TimeConfig {
    /// Reject values that would stall `fixed_steps` or run time backwards
    pub fn validate(&self) -> Result<(), TimeConfigError> {
        for (field, value) in [
            ("fixed_timestep", self.fixed_timestep),
            ("max_delta_time", self.max_delta_time),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TimeConfigError::NotPositive { field, value });
            }
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(TimeConfigError::BadTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since game start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.min(self.config.max_delta_time);
        self.frame_count += 1;

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// The fixed physics timestep in seconds
    pub fn fixed_delta(&self) -> f32 {
        self.config.fixed_timestep
    }
}

/// A one-shot timer that is ticked explicitly each frame.
///
/// Stands in for "wait N seconds then continue" routines so the state that
/// depends on it stays inspectable and cancellable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: Option<f32>,
}

impl Countdown {
    /// An idle countdown
    pub const fn idle() -> Self {
        Self { remaining: None }
    }

    /// Start (or restart) the countdown
    pub fn start(&mut self, duration: f32) {
        self.remaining = Some(duration.max(0.0));
    }

    /// Stop the countdown without firing
    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Whether the countdown is running
    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, or zero when idle
    pub fn remaining(&self) -> f32 {
        self.remaining.unwrap_or(0.0)
    }

    /// Advance by `dt`. Returns true exactly once, on the tick it elapses.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };

        *remaining -= dt;
        if *remaining <= 0.0 {
            self.remaining = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        time.config.time_scale = 0.0;
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);
        assert_eq!(time.frame_count, 2);
    }

    #[test]
    fn test_validate_rejects_stalling_timestep() {
        assert!(TimeConfig::default().validate().is_ok());

        let config = TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(TimeConfigError::NotPositive {
                field: "fixed_timestep",
                value: 0.0
            })
        );

        let config = TimeConfig {
            max_delta_time: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TimeConfigError::NotPositive { field: "max_delta_time", .. })
        ));

        let config = TimeConfig {
            time_scale: -1.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(TimeConfigError::BadTimeScale(-1.0)));
    }

    #[test]
    fn test_fixed_steps() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.02,
            ..Default::default()
        });
        time.update(0.05);
        assert_eq!(time.fixed_steps(), 2);
        assert_eq!(time.fixed_steps(), 0);

        time.update(0.011);
        assert_eq!(time.fixed_steps(), 1);
    }

    #[test]
    fn test_delta_clamped() {
        let mut time = GameTime::default();
        time.update(3.0);
        assert_eq!(time.delta_time, time.config.max_delta_time);
    }

    #[test]
    fn test_countdown_fires_once() {
        let mut timer = Countdown::idle();
        assert!(!timer.tick(1.0));

        timer.start(0.3);
        assert!(timer.is_running());
        assert!(!timer.tick(0.1));
        assert!(!timer.tick(0.1));
        assert!(timer.tick(0.15));
        assert!(!timer.is_running());
        assert!(!timer.tick(0.15));
    }

    #[test]
    fn test_countdown_cancel() {
        let mut timer = Countdown::idle();
        timer.start(0.3);
        timer.cancel();
        assert!(!timer.tick(1.0));
        assert_eq!(timer.remaining(), 0.0);
    }
}
