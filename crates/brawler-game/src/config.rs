//! Controller configuration

use serde::{Deserialize, Serialize};

use brawler_physics::LayerMask;

use crate::camera::CameraConfig;
use crate::combat::AttackProfile;
use crate::error::ConfigError;
use crate::ground::GroundConfig;
use crate::player::{LocomotionModel, MovementConfig};

/// Everything a [`ThirdPersonController`](crate::ThirdPersonController) is
/// built from. Missing sections and fields fall back to defaults; movement
/// tuning and camera yaw sync follow `movement.model`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub movement: MovementConfig,
    pub camera: CameraConfig,
    pub combat: AttackProfile,
    pub ground: GroundConfig,
}

impl ControllerConfig {
    /// Kinematic model with the camera steering the character's heading
    pub fn kinematic() -> Self {
        Self {
            movement: MovementConfig::kinematic(),
            ..Default::default()
        }
    }

    /// Dynamic model. Unlike the kinematic preset, the character is not held
    /// to the camera's heading; it turns toward its direction of travel.
    /// Set `camera.sync_character_yaw` to restore camera-facing.
    pub fn dynamic() -> Self {
        Self {
            movement: MovementConfig::dynamic(),
            ..Default::default()
        }
    }

    pub fn model(&self) -> LocomotionModel {
        self.movement.model
    }

    /// Whether the character turns to the camera's heading every frame
    pub fn syncs_character_yaw(&self) -> bool {
        self.camera
            .sync_character_yaw
            .unwrap_or(self.model() == LocomotionModel::Kinematic)
    }

    /// Check every value the controller divides by, integrates or sweeps with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let movement = &self.movement;
        positive("movement.move_speed", movement.move_speed)?;
        positive("movement.rotation_speed", movement.rotation_speed)?;
        positive("movement.jump_force", movement.jump_force)?;
        positive("movement.gravity", movement.gravity)?;
        positive("movement.velocity_gain", movement.velocity_gain)?;

        positive("camera.sensitivity", self.camera.sensitivity)?;
        positive("camera.follow_sharpness", self.camera.follow_sharpness)?;

        positive("combat.attack_range", self.combat.attack_range)?;
        non_negative("combat.punch_force", self.combat.punch_force)?;
        non_negative("combat.kick_force", self.combat.kick_force)?;
        non_negative("combat.attack_flag_duration", self.combat.attack_flag_duration)?;
        if self.combat.attackable_mask.is_empty() {
            return Err(ConfigError::EmptyAttackableMask);
        }

        positive("ground.check_distance", self.ground.check_distance)?;
        non_negative("ground.probe_height", self.ground.probe_height)?;
        non_negative("ground.land_animation_duration", self.ground.land_animation_duration)?;
        if self.ground.ground_mask.intersects(LayerMask::PLAYER) {
            return Err(ConfigError::GroundMaskIncludesPlayer);
        }

        Ok(())
    }
}

// NaN fails both checks
fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ground::GroundProbe;

    #[test]
    fn test_presets_validate() {
        assert!(ControllerConfig::default().validate().is_ok());
        assert!(ControllerConfig::kinematic().validate().is_ok());
        assert!(ControllerConfig::dynamic().validate().is_ok());
    }

    #[test]
    fn test_dynamic_preset() {
        let config = ControllerConfig::dynamic();
        assert_eq!(config.model(), LocomotionModel::Dynamic);
        assert_eq!(config.movement.move_speed, 5.0);
        assert_eq!(config.movement.jump_force, 8.0);
        assert!(!config.syncs_character_yaw());
        assert!(ControllerConfig::kinematic().syncs_character_yaw());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = ControllerConfig::default();
        config.movement.gravity = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "movement.gravity",
                value: 0.0
            })
        );

        let mut config = ControllerConfig::default();
        config.combat.kick_force = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "combat.kick_force", .. })
        ));

        let mut config = ControllerConfig::default();
        config.ground.check_distance = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_masks() {
        let mut config = ControllerConfig::default();
        config.combat.attackable_mask = LayerMask::NONE;
        assert_eq!(config.validate(), Err(ConfigError::EmptyAttackableMask));

        let mut config = ControllerConfig::default();
        config.ground.ground_mask = LayerMask::ALL;
        assert_eq!(config.validate(), Err(ConfigError::GroundMaskIncludesPlayer));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let text = r#"
            [movement]
            model = "dynamic"
            move_speed = 6.5

            [ground]
            probe = "sphere"

            [combat]
            kick_force = 20.0
        "#;
        let config: ControllerConfig = toml::from_str(text).unwrap();

        assert_eq!(config.model(), LocomotionModel::Dynamic);
        assert_eq!(config.movement.move_speed, 6.5);
        // Unspecified movement fields come from the model's preset
        assert_eq!(config.movement.gravity, 9.81);
        assert_eq!(config.ground.probe, GroundProbe::Sphere);
        assert_eq!(config.ground.check_distance, 0.2);
        assert_eq!(config.combat.kick_force, 20.0);
        assert_eq!(config.combat.punch_force, 10.0);
        assert_eq!(config.camera.offset, glam::Vec3::new(0.0, 2.0, 5.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_alone_selects_its_tuning() {
        let config: ControllerConfig = toml::from_str("[movement]\nmodel = \"dynamic\"\n").unwrap();
        let preset = MovementConfig::dynamic();
        assert_eq!(config.movement.move_speed, preset.move_speed);
        assert_eq!(config.movement.jump_force, preset.jump_force);
        assert_eq!(config.movement.gravity, preset.gravity);
        assert!(!config.syncs_character_yaw());

        let config: ControllerConfig = toml::from_str(
            "[movement]\nmodel = \"dynamic\"\n[camera]\nsync_character_yaw = true\n",
        )
        .unwrap();
        assert!(config.syncs_character_yaw());

        let config: ControllerConfig = toml::from_str("").unwrap();
        assert_eq!(config.model(), LocomotionModel::Kinematic);
        assert_eq!(config.movement.move_speed, 0.4);
        assert!(config.syncs_character_yaw());
    }

    #[test]
    fn test_layer_masks_parse_as_bits() {
        let config: ControllerConfig = toml::from_str("[combat]\nattackable_mask = 6\n").unwrap();
        assert_eq!(
            config.combat.attackable_mask,
            LayerMask::ENVIRONMENT | LayerMask::ATTACKABLE
        );
    }
}
