//! R-tree of guard positions, rebuilt once per tick.
//!
//! Peer detection asks "who is close enough to possibly be in sight"
//! before running the exact cone + line-of-sight check.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sn_core::{AgentId, Pose, Vec2};

#[derive(Clone)]
struct AgentEntry {
    point: [f32; 2],
    id: AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over agent positions.
pub struct AgentIndex {
    tree: RTree<AgentEntry>,
}

impl Default for AgentIndex {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl AgentIndex {
    /// Replace the index contents; `poses[i]` belongs to `AgentId(i)`.
    pub fn rebuild(&mut self, poses: &[Pose]) {
        let entries = poses
            .iter()
            .enumerate()
            .map(|(i, p)| AgentEntry { point: [p.position.x, p.position.y], id: AgentId(i as u32) })
            .collect();
        self.tree = RTree::bulk_load(entries);
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Agents within `radius` of `center`, in ascending id order.
    pub fn within(&self, center: Vec2, radius: f32) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self
            .tree
            .locate_within_distance([center.x, center.y], radius * radius)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
