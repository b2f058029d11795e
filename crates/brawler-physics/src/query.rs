//! Spatial query seam between the controller and the physics host

use glam::Vec3;
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::LayerMask;

/// Detailed raycast hit information
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
}

/// A collider touched by a shape sweep
#[derive(Debug, Clone)]
pub struct ShapeHit {
    /// The collider that was touched
    pub collider: ColliderHandle,
    /// The rigid body owning the collider, if any
    pub body: Option<RigidBodyHandle>,
    /// World position of the owning body (or of the collider when static)
    pub position: Vec3,
}

/// Queries and impulses the character controller needs from the world.
///
/// `PhysicsWorld` implements this over rapier; tests substitute fixed worlds.
pub trait PhysicsQuery {
    /// Cast a ray and return the first hit on `mask`
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit>;

    /// Whether a sphere at `center` overlaps anything on `mask`
    fn overlaps_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// Sweep a sphere from `origin` along `direction` and report every
    /// collider on `mask` it touches, nearest first
    fn sweep_sphere_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<ShapeHit>;

    /// Apply an instantaneous impulse to a dynamic body
    fn apply_impulse(&mut self, body: RigidBodyHandle, impulse: Vec3);
}
