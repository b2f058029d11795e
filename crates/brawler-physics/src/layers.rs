//! Collision layer masks
//!
//! A thin serializable wrapper over rapier's `Group` bitflags, so layer masks
//! can live in configuration files.

use rapier3d::prelude::{Group, InteractionGroups, QueryFilter};
use serde::{Deserialize, Serialize};

/// Bitmask of collision layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    /// The controlled character's own collider
    pub const PLAYER: LayerMask = LayerMask(1 << 0);
    /// Static level geometry
    pub const ENVIRONMENT: LayerMask = LayerMask(1 << 1);
    /// Bodies that melee attacks can push
    pub const ATTACKABLE: LayerMask = LayerMask(1 << 2);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Whether no layer is set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether any layer of `other` is set in this mask
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    /// This mask without the layers of `other`
    pub fn without(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 & !other.0)
    }

    /// The rapier group with the same bits
    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }

    /// Collision groups for a collider that lives on this layer and collides
    /// with everything
    pub fn membership(self) -> InteractionGroups {
        InteractionGroups::new(self.group(), Group::ALL)
    }

    /// Query filter that only reports colliders on this mask's layers
    pub fn query_filter(self) -> QueryFilter<'static> {
        QueryFilter::new().groups(InteractionGroups::new(Group::ALL, self.group()))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_ops() {
        let ground = LayerMask::ALL.without(LayerMask::PLAYER);
        assert!(!ground.intersects(LayerMask::PLAYER));
        assert!(ground.intersects(LayerMask::ENVIRONMENT));
        assert!((LayerMask::ENVIRONMENT | LayerMask::ATTACKABLE).intersects(LayerMask::ATTACKABLE));
        assert!(LayerMask::NONE.is_empty());
    }

    #[test]
    fn test_mask_group_bits() {
        assert_eq!(LayerMask::ATTACKABLE.group(), Group::GROUP_3);
        assert_eq!(LayerMask::ALL.group(), Group::ALL);
    }
}
