//! Ground sensing
//!
//! Classifies the character as grounded or airborne with a short downward
//! probe and reports the edges between the two. Landing timing belongs to the
//! caller; the sensor only remembers whether a landing sequence is active so
//! it can suppress repeated landing edges.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use brawler_physics::{LayerMask, PhysicsQuery};

/// Shape of the downward ground probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundProbe {
    /// Ray straight down from the probe point for `check_distance`
    Ray,
    /// Sphere of radius `check_distance` centered on the probe point
    Sphere,
}

/// Ground sensing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Probe shape
    pub probe: GroundProbe,
    /// Height above the feet the probe starts from
    pub probe_height: f32,
    /// Probe reach (ray length or sphere radius)
    pub check_distance: f32,
    /// Layers that count as ground
    pub ground_mask: LayerMask,
    /// How long the landing sequence lasts, in seconds
    pub land_animation_duration: f32,
    /// Abort a running landing sequence when the character leaves the ground
    pub cancel_landing_when_airborne: bool,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            probe: GroundProbe::Ray,
            probe_height: 0.1,
            check_distance: 0.2,
            ground_mask: LayerMask::ALL.without(LayerMask::PLAYER),
            land_animation_duration: 0.3,
            cancel_landing_when_airborne: false,
        }
    }
}

/// Edge reported by a ground sensor update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundTransition {
    /// No state change worth reacting to
    None,
    /// Airborne → grounded with no landing sequence active
    JustLanded,
    /// Grounded → airborne
    JustLeftGround,
}

/// Grounded/landing state plus the probe that drives it
#[derive(Debug, Clone)]
pub struct GroundSensor {
    config: GroundConfig,
    grounded: bool,
    landing: bool,
}

impl GroundSensor {
    /// Create a sensor. Starts grounded so spawning on the floor does not
    /// count as a landing.
    pub fn new(config: GroundConfig) -> Self {
        Self {
            config,
            grounded: true,
            landing: false,
        }
    }

    pub fn config(&self) -> &GroundConfig {
        &self.config
    }

    /// Whether the last probe found ground
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether a landing sequence is active
    pub fn is_landing(&self) -> bool {
        self.landing
    }

    /// Mark the landing sequence as started or finished
    pub fn set_landing(&mut self, landing: bool) {
        self.landing = landing;
    }

    /// Probe the world below `position` (the character's feet)
    pub fn update(&mut self, world: &impl PhysicsQuery, position: Vec3) -> GroundTransition {
        self.update_with_support(world, position, false)
    }

    /// Like [`update`](Self::update), but `supported` counts as ground even
    /// when nothing is found below, e.g. a body resting on a ledge corner
    /// beside the ray.
    pub fn update_with_support(
        &mut self,
        world: &impl PhysicsQuery,
        position: Vec3,
        supported: bool,
    ) -> GroundTransition {
        let was_grounded = self.grounded;
        self.grounded = supported || self.probe(world, position);

        match (was_grounded, self.grounded) {
            (false, true) if !self.landing => GroundTransition::JustLanded,
            (true, false) => GroundTransition::JustLeftGround,
            _ => GroundTransition::None,
        }
    }

    fn probe(&self, world: &impl PhysicsQuery, position: Vec3) -> bool {
        let origin = position + Vec3::Y * self.config.probe_height;
        match self.config.probe {
            GroundProbe::Ray => world
                .cast_ray(
                    origin,
                    Vec3::NEG_Y,
                    self.config.check_distance,
                    self.config.ground_mask,
                )
                .is_some(),
            GroundProbe::Sphere => {
                world.overlaps_sphere(origin, self.config.check_distance, self.config.ground_mask)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brawler_physics::{ColliderHandle, RaycastHit, RigidBodyHandle, ShapeHit};

    /// Flat floor at a fixed height, answering only ground probes
    struct Floor {
        height: Option<f32>,
        layer: LayerMask,
    }

    impl Floor {
        fn at(height: f32) -> Self {
            Self {
                height: Some(height),
                layer: LayerMask::ENVIRONMENT,
            }
        }

        fn none() -> Self {
            Self {
                height: None,
                layer: LayerMask::ENVIRONMENT,
            }
        }
    }

    impl PhysicsQuery for Floor {
        fn cast_ray(
            &self,
            origin: Vec3,
            direction: Vec3,
            max_distance: f32,
            mask: LayerMask,
        ) -> Option<RaycastHit> {
            let height = self.height?;
            if !mask.intersects(self.layer) || direction.y >= 0.0 {
                return None;
            }
            let distance = (origin.y - height) / -direction.y;
            (0.0..=max_distance).contains(&distance).then(|| RaycastHit {
                collider: ColliderHandle::from_raw_parts(0, 0),
                distance,
                point: origin + direction * distance,
                normal: Vec3::Y,
            })
        }

        fn overlaps_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
            match self.height {
                Some(height) => mask.intersects(self.layer) && center.y - radius <= height,
                None => false,
            }
        }

        fn sweep_sphere_all(
            &self,
            _origin: Vec3,
            _radius: f32,
            _direction: Vec3,
            _max_distance: f32,
            _mask: LayerMask,
        ) -> Vec<ShapeHit> {
            Vec::new()
        }

        fn apply_impulse(&mut self, _body: RigidBodyHandle, _impulse: Vec3) {}
    }

    fn airborne_sensor() -> GroundSensor {
        airborne(GroundConfig::default())
    }

    fn airborne(config: GroundConfig) -> GroundSensor {
        let mut sensor = GroundSensor::new(config);
        sensor.update(&Floor::none(), Vec3::ZERO);
        assert!(!sensor.is_grounded());
        sensor
    }

    #[test]
    fn test_lands_once() {
        let floor = Floor::at(0.0);
        let mut sensor = airborne_sensor();

        assert_eq!(sensor.update(&floor, Vec3::new(0.0, 0.05, 0.0)), GroundTransition::JustLanded);
        assert!(sensor.is_grounded());
        // Same world, same position: no second edge
        assert_eq!(sensor.update(&floor, Vec3::new(0.0, 0.05, 0.0)), GroundTransition::None);
    }

    #[test]
    fn test_no_landing_edge_while_landing() {
        let floor = Floor::at(0.0);
        let mut sensor = airborne_sensor();
        sensor.set_landing(true);

        assert_eq!(sensor.update(&floor, Vec3::ZERO), GroundTransition::None);
        assert!(sensor.is_grounded());
    }

    #[test]
    fn test_leaves_ground() {
        let floor = Floor::at(0.0);
        let mut sensor = GroundSensor::new(GroundConfig::default());

        assert_eq!(sensor.update(&floor, Vec3::ZERO), GroundTransition::None);
        assert_eq!(
            sensor.update(&floor, Vec3::new(0.0, 1.0, 0.0)),
            GroundTransition::JustLeftGround
        );
        assert!(!sensor.is_grounded());
    }

    #[test]
    fn test_probe_reach() {
        let floor = Floor::at(0.0);
        let mut sensor = airborne_sensor();

        // Probe starts 0.1 above the feet and reaches 0.2 down
        assert_eq!(sensor.update(&floor, Vec3::new(0.0, 0.15, 0.0)), GroundTransition::None);
        assert!(!sensor.is_grounded());
        assert_eq!(sensor.update(&floor, Vec3::new(0.0, -0.05, 0.0)), GroundTransition::JustLanded);
    }

    #[test]
    fn test_ground_mask_filters() {
        let mut floor = Floor::at(0.0);
        floor.layer = LayerMask::PLAYER;
        let mut sensor = airborne_sensor();

        sensor.update(&floor, Vec3::ZERO);
        assert!(!sensor.is_grounded());
    }

    #[test]
    fn test_sphere_probe() {
        let floor = Floor::at(0.0);
        let mut sensor = airborne(GroundConfig {
            probe: GroundProbe::Sphere,
            ..Default::default()
        });

        assert_eq!(sensor.update(&floor, Vec3::ZERO), GroundTransition::JustLanded);
        sensor.update(&Floor::none(), Vec3::ZERO);
        assert!(!sensor.is_grounded());
    }

    #[test]
    fn test_support_counts_as_ground() {
        let mut sensor = airborne_sensor();

        assert_eq!(
            sensor.update_with_support(&Floor::none(), Vec3::ZERO, true),
            GroundTransition::JustLanded
        );
        assert!(sensor.is_grounded());
        assert_eq!(
            sensor.update_with_support(&Floor::none(), Vec3::ZERO, false),
            GroundTransition::JustLeftGround
        );
    }
}
