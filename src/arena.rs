//! Test arena: a floor, a low wall and a row of crates to push around

use brawler_physics::{LayerMask, PhysicsWorld, RigidBodyHandle};
use glam::Vec3;
use tracing::info;

/// Handles to the pushable bodies in the arena
pub struct Arena {
    pub crates: Vec<RigidBodyHandle>,
}

impl Arena {
    /// Populate `physics` with the arena geometry
    pub fn build(physics: &mut PhysicsWorld) -> Self {
        physics.create_ground(0.0);
        // Wall across the far end of the walkway
        physics.create_static_box(Vec3::new(6.0, 1.0, 0.25), Vec3::new(0.0, 1.0, -12.0));

        let crates = [-1.5, -3.0, -4.5]
            .into_iter()
            .enumerate()
            .map(|(i, z)| {
                let x = (i as f32 - 1.0) * 0.4;
                physics.create_dynamic_box(Vec3::splat(0.35), Vec3::new(x, 0.35, z), LayerMask::ATTACKABLE)
            })
            .collect::<Vec<_>>();

        physics.update_queries();
        info!("Arena ready with {} crates", crates.len());
        Self { crates }
    }

    /// Crate positions, for reporting
    pub fn crate_positions<'a>(&'a self, physics: &'a PhysicsWorld) -> impl Iterator<Item = Vec3> + 'a {
        self.crates.iter().filter_map(|&handle| {
            physics.get_rigid_body(handle).map(|rb| {
                let t = rb.translation();
                Vec3::new(t.x, t.y, t.z)
            })
        })
    }
}
