//! Combat module
//!
//! Melee attacks as pure physics pushes: a sphere sweep in front of the
//! character and an impulse on every body it touches. No damage model.

pub mod melee;

pub use melee::{
    AttackKind, AttackProfile, HitResult, MeleeResolver, ATTACK_ORIGIN_HEIGHT,
    ATTACK_SWEEP_RADIUS, ATTACK_UPWARD_BIAS,
};
