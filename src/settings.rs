//! Driver settings with persistence
//!
//! Settings are read from the path given on the command line, or from
//! `~/.config/brawler/settings.toml` when none is given.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use brawler_core::TimeConfig;
use brawler_game::ControllerConfig;

/// All driver settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub controller: ControllerConfig,
    pub time: TimeConfig,
    pub session: SessionSettings,
}

/// Length and pacing of the scripted session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Simulated seconds to run
    pub duration: f32,
    /// Simulated frames per second
    pub frame_rate: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration: 6.0,
            frame_rate: 60.0,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("brawler"))
    }

    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from an explicit path. Unlike [`Settings::load`], a
    /// missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Load settings from the default location, or return defaults if not
    /// found
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk, creating the parent directory if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brawler_game::LocomotionModel;

    #[test]
    fn test_partial_file() {
        let settings: Settings = toml::from_str(
            r#"
            [controller.movement]
            model = "dynamic"

            [session]
            duration = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.controller.model(), LocomotionModel::Dynamic);
        assert_eq!(settings.session.duration, 2.0);
        assert_eq!(settings.session.frame_rate, 60.0);
        assert_eq!(settings.time.fixed_timestep, 1.0 / 50.0);
    }

    #[test]
    fn test_zero_timestep_loads_but_fails_validation() {
        let settings: Settings = toml::from_str("[time]\nfixed_timestep = 0.0\n").unwrap();
        assert!(settings.time.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("brawler-settings-does-not-exist.toml");
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("brawler-settings-{}.toml", std::process::id()));
        let mut settings = Settings::default();
        settings.session.duration = 3.5;
        settings.controller.combat.kick_force = 12.0;

        settings.save(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.session.duration, 3.5);
        assert_eq!(loaded.controller.combat.kick_force, 12.0);
    }
}
