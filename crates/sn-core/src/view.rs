//! Read-only views of the host world that agents consult while deciding.
//!
//! Both are implemented by the scene owner (`sn-sim::SceneWorld` in this
//! workspace); tests use small hand-written stand-ins.

use crate::{ObjectId, Vec2};

/// Collectible resources (health packs) currently present in the world.
pub trait ResourceView {
    /// Position of resource `id`, or `None` once it has been picked up.
    fn resource_position(&self, id: ObjectId) -> Option<Vec2>;

    /// Every resource still present, in ascending id order.
    fn resources(&self) -> Vec<(ObjectId, Vec2)>;

    #[inline]
    fn resource_exists(&self, id: ObjectId) -> bool {
        self.resource_position(id).is_some()
    }
}

/// The object guards are looking for.
pub trait TargetView {
    /// Body id and position of the target, or `None` if there is none.
    fn target(&self) -> Option<(ObjectId, Vec2)>;
}

impl<T: ResourceView + ?Sized> ResourceView for &T {
    fn resource_position(&self, id: ObjectId) -> Option<Vec2> {
        (**self).resource_position(id)
    }

    fn resources(&self) -> Vec<(ObjectId, Vec2)> {
        (**self).resources()
    }
}

impl<T: TargetView + ?Sized> TargetView for &T {
    fn target(&self) -> Option<(ObjectId, Vec2)> {
        (**self).target()
    }
}
