//! The spatial occlusion capability supplied by the host environment.
//!
//! Perception, sound propagation and grid walkability all ask the same
//! question: "what does a ray from here hit first?"  The host implements
//! [`Occlusion`] once; every subsystem consumes it through a generic bound.

use bitflags::bitflags;

use crate::{ObjectId, Vec2};

bitflags! {
    /// Physics layers a query should consider.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LayerMask: u32 {
        /// Static geometry that blocks sight and sound.
        const WALLS     = 1 << 0;
        /// The player and its child colliders.
        const TARGET    = 1 << 1;
        /// Guard bodies.
        const AGENTS    = 1 << 2;
        /// Collectible resources (health packs).
        const RESOURCES = 1 << 3;
    }
}

/// The first object struck by a raycast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    pub point: Vec2,
    pub distance: f32,
    pub object: ObjectId,
}

/// Line-of-sight and point-overlap queries against the host world.
pub trait Occlusion {
    /// Cast a ray from `origin` along `direction` (unit length) for at most
    /// `max_distance`, returning the nearest hit on any layer in `mask`.
    fn raycast(
        &self,
        origin:       Vec2,
        direction:    Vec2,
        max_distance: f32,
        mask:         LayerMask,
    ) -> Option<Hit>;

    /// `true` if `point` lies inside geometry on any layer in `mask`.
    ///
    /// Default: derived from a zero-length probe, which most hosts should
    /// override with a real point query.
    fn overlaps(&self, point: Vec2, mask: LayerMask) -> bool {
        self.raycast(point, Vec2::new(1.0, 0.0), 0.0, mask).is_some()
    }

    /// `true` if `object` is `root` or one of its child colliders.
    fn is_part_of(&self, object: ObjectId, root: ObjectId) -> bool {
        object == root
    }

    /// `true` if nothing on `mask` blocks the segment `from → to`.
    fn line_of_sight(&self, from: Vec2, to: Vec2, mask: LayerMask) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return true;
        }
        self.raycast(from, delta * (1.0 / distance), distance, mask).is_none()
    }
}

impl<T: Occlusion + ?Sized> Occlusion for &T {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<Hit> {
        (**self).raycast(origin, direction, max_distance, mask)
    }

    fn overlaps(&self, point: Vec2, mask: LayerMask) -> bool {
        (**self).overlaps(point, mask)
    }

    fn is_part_of(&self, object: ObjectId, root: ObjectId) -> bool {
        (**self).is_part_of(object, root)
    }
}
