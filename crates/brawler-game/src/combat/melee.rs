//! Melee hit resolution
//!
//! Punch and kick share one resolution path and differ only in force.

use std::collections::HashSet;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use brawler_physics::{LayerMask, PhysicsQuery, RigidBodyHandle};

/// Radius of the sphere swept in front of the character
pub const ATTACK_SWEEP_RADIUS: f32 = 0.5;
/// Height above the feet the sweep starts from
pub const ATTACK_ORIGIN_HEIGHT: f32 = 0.5;
/// Vertical component of every knockback direction
pub const ATTACK_UPWARD_BIAS: f32 = 0.3;

/// Attack kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Punch,
    Kick,
}

impl fmt::Display for AttackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Punch => f.write_str("Punch"),
            Self::Kick => f.write_str("Kick"),
        }
    }
}

/// Melee tuning, fixed at construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfile {
    /// Impulse magnitude of a punch
    pub punch_force: f32,
    /// Impulse magnitude of a kick
    pub kick_force: f32,
    /// Sweep distance in front of the character
    pub attack_range: f32,
    /// Layers attacks can push
    pub attackable_mask: LayerMask,
    /// How long the attack flag stays raised after a punch, in seconds
    pub attack_flag_duration: f32,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self {
            punch_force: 10.0,
            kick_force: 15.0,
            attack_range: 2.0,
            attackable_mask: LayerMask::ATTACKABLE,
            attack_flag_duration: 0.6,
        }
    }
}

impl AttackProfile {
    /// Impulse magnitude for an attack kind
    pub fn force(&self, kind: AttackKind) -> f32 {
        match kind {
            AttackKind::Punch => self.punch_force,
            AttackKind::Kick => self.kick_force,
        }
    }
}

/// One body pushed by an attack
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    /// The body that was pushed
    pub body: RigidBodyHandle,
    /// Knockback direction: horizontal unit vector with `y` set to the bias
    pub direction: Vec3,
    /// Impulse applied to the body
    pub impulse: Vec3,
}

/// Resolves attacks against the physics world
#[derive(Debug, Clone)]
pub struct MeleeResolver {
    profile: AttackProfile,
}

impl MeleeResolver {
    pub fn new(profile: AttackProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &AttackProfile {
        &self.profile
    }

    /// Sweep in front of the character and push every distinct body hit.
    ///
    /// `position` is the attacker's feet, `forward` its facing. `exclude`
    /// keeps the attacker's own body out of the results.
    pub fn resolve(
        &self,
        kind: AttackKind,
        position: Vec3,
        forward: Vec3,
        world: &mut impl PhysicsQuery,
        exclude: Option<RigidBodyHandle>,
    ) -> Vec<HitResult> {
        let origin = position + Vec3::Y * ATTACK_ORIGIN_HEIGHT;
        let hits = world.sweep_sphere_all(
            origin,
            ATTACK_SWEEP_RADIUS,
            forward,
            self.profile.attack_range,
            self.profile.attackable_mask,
        );

        let force = self.profile.force(kind);
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for hit in hits {
            // Static colliders have nothing to push
            let Some(body) = hit.body else {
                continue;
            };
            if Some(body) == exclude || !seen.insert(body) {
                continue;
            }

            let direction = knockback_direction(position, hit.position, forward);
            let impulse = direction * force;
            world.apply_impulse(body, impulse);
            tracing::debug!("{kind} hit: {body:?}");

            results.push(HitResult {
                body,
                direction,
                impulse,
            });
        }

        results
    }
}

/// Horizontal direction from attacker to target, lifted by the upward bias
fn knockback_direction(attacker: Vec3, target: Vec3, fallback: Vec3) -> Vec3 {
    let flat = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();

    let mut direction = flat(target - attacker);
    if direction == Vec3::ZERO {
        direction = flat(fallback);
    }
    direction.y = ATTACK_UPWARD_BIAS;
    direction
}
