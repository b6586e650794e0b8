//! Reference host environment: tile walls, one target body and a set of
//! collectible resources.
//!
//! Embedders with a real engine implement [`Occlusion`], [`ResourceView`]
//! and [`TargetView`] on their own scene; `SceneWorld` is what the demo and
//! the scenario tests run against.
//!
//! Bodies are circles.  A ray's first hit is the nearest of the wall hit
//! and every body whose layer is in the mask.

use std::collections::BTreeMap;

use sn_core::{Hit, LayerMask, ObjectId, Occlusion, ResourceView, TargetView, Vec2};
use sn_perception::Target;
use sn_spatial::TileGrid;

/// The target's body id.
pub const TARGET_OBJECT: ObjectId = ObjectId(0);

/// A circular body in the scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn contains(&self, p: Vec2) -> bool {
        self.position.distance(p) <= self.radius
    }

    /// Distance along the unit ray `dir` from `origin` to this body, if it
    /// is hit within `max`.  An origin inside the body hits at 0.
    pub fn ray_hit(&self, origin: Vec2, dir: Vec2, max: f32) -> Option<f32> {
        let m = origin - self.position;
        let c = m.length_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let b = m.dot(dir);
        if b > 0.0 {
            return None;
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t <= max).then_some(t)
    }
}

/// A resource still lying in the world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resource {
    pub body: Body,
    /// Health restored on pickup.
    pub heal: f32,
}

/// Tile walls plus bodies.
#[derive(Clone, Debug)]
pub struct SceneWorld {
    pub grid: TileGrid,
    target: Option<Body>,
    resources: BTreeMap<ObjectId, Resource>,
    next_object: u32,
    /// Collision radius of newly placed resources.  Default: 0.5.
    pub pickup_radius: f32,
    /// Health restored by newly placed resources.  Default: 20.
    pub resource_heal: f32,
    /// Default: 0.3.
    pub target_radius: f32,
}

impl SceneWorld {
    pub fn new(grid: TileGrid) -> Self {
        Self {
            grid,
            target: None,
            resources: BTreeMap::new(),
            next_object: TARGET_OBJECT.0 + 1,
            pickup_radius: 0.5,
            resource_heal: 20.0,
            target_radius: 0.3,
        }
    }

    // ── Target ────────────────────────────────────────────────────────────

    /// Place (or move) the target.
    pub fn set_target_position(&mut self, position: Vec2) {
        self.target = Some(Body { position, radius: self.target_radius });
    }

    pub fn remove_target(&mut self) {
        self.target = None;
    }

    pub fn target_body(&self) -> Option<Body> {
        self.target
    }

    /// The target in the form perception consumes.
    pub fn perception_target(&self) -> Option<Target> {
        self.target.map(|b| Target { object: TARGET_OBJECT, position: b.position })
    }

    // ── Resources ─────────────────────────────────────────────────────────

    /// Drop a resource at `position` and return its id.
    pub fn add_resource(&mut self, position: Vec2) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.resources.insert(
            id,
            Resource { body: Body { position, radius: self.pickup_radius }, heal: self.resource_heal },
        );
        id
    }

    pub fn remove_resource(&mut self, id: ObjectId) -> Option<Resource> {
        self.resources.remove(&id)
    }

    pub fn resource(&self, id: ObjectId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Remove and return the lowest-id resource overlapping `position`.
    pub fn take_resource_at(&mut self, position: Vec2) -> Option<(ObjectId, Resource)> {
        let id = self
            .resources
            .iter()
            .find(|(_, r)| r.body.contains(position))
            .map(|(&id, _)| id)?;
        self.resources.remove(&id).map(|r| (id, r))
    }

    fn bodies(&self, mask: LayerMask) -> impl Iterator<Item = (ObjectId, Body)> + '_ {
        let target = mask
            .contains(LayerMask::TARGET)
            .then_some(self.target)
            .flatten()
            .map(|b| (TARGET_OBJECT, b));
        let resources = mask
            .contains(LayerMask::RESOURCES)
            .then(|| self.resources.iter().map(|(&id, r)| (id, r.body)))
            .into_iter()
            .flatten();
        target.into_iter().chain(resources)
    }
}

impl Occlusion for SceneWorld {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, mask: LayerMask) -> Option<Hit> {
        let dir = direction.normalized();
        let mut best = self.grid.raycast(origin, dir, max_distance, mask);
        for (object, body) in self.bodies(mask) {
            let Some(t) = body.ray_hit(origin, dir, max_distance) else { continue };
            if best.is_none_or(|h| t < h.distance) {
                best = Some(Hit { point: origin + dir * t, distance: t, object });
            }
        }
        best
    }

    fn overlaps(&self, point: Vec2, mask: LayerMask) -> bool {
        self.grid.overlaps(point, mask) || self.bodies(mask).any(|(_, b)| b.contains(point))
    }
}

impl ResourceView for SceneWorld {
    fn resource_position(&self, id: ObjectId) -> Option<Vec2> {
        self.resources.get(&id).map(|r| r.body.position)
    }

    fn resources(&self) -> Vec<(ObjectId, Vec2)> {
        self.resources.iter().map(|(&id, r)| (id, r.body.position)).collect()
    }
}

impl TargetView for SceneWorld {
    fn target(&self) -> Option<(ObjectId, Vec2)> {
        self.target.map(|b| (TARGET_OBJECT, b.position))
    }
}
