//! Per-agent typed blackboard.
//!
//! Owned by exactly one agent.  The only other writer is
//! [`IntelExchange`](crate::IntelExchange), which merges a peer's snapshot.

use std::collections::BTreeMap;

use sn_acoustic::SoundKind;
use sn_core::{ObjectId, SimTime, Vec2};
use sn_spatial::Path;

// ── Belief records ────────────────────────────────────────────────────────────

/// Where the target was believed to be, and when.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sighting {
    pub position: Vec2,
    pub time: SimTime,
}

/// Time-boxed sub-threshold alarm.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suspicion {
    /// Seconds left before suspicion lapses.
    pub remaining: f32,
}

impl Suspicion {
    /// Extend the countdown to at least `duration` seconds.
    pub fn raise(&mut self, duration: f32) {
        self.remaining = self.remaining.max(duration);
    }

    /// Count down by `dt` seconds, stopping at zero.
    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}

/// The last sound important enough to investigate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeardSound {
    pub position: Vec2,
    pub kind: SoundKind,
    /// Attenuated volume at the listener.
    pub volume: f32,
    pub frequency: f32,
    pub direct: bool,
    /// Multiplier on move speed while investigating (1.0 direct, 0.7 muffled).
    pub speed_factor: f32,
}

/// A collectible resource the agent has seen or been told about.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSighting {
    pub position: Vec2,
    /// When this agent (or the peer it learned from) first saw it.
    pub discovered: SimTime,
}

/// Names of the fields in [`AgentMemory`], for the generic `has` / `forget`
/// contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemoryKey {
    Path,
    LastKnownTarget,
    TargetVisible,
    VisibleConfidence,
    Suspicion,
    Heard,
    KnownResources,
    TargetResource,
    WaypointIndex,
    IntelReceived,
}

// ── AgentMemory ───────────────────────────────────────────────────────────────

/// Everything one guard currently believes.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentMemory {
    pub path: Option<Path>,
    /// Next waypoint of `path` to walk to.
    pub path_index: usize,
    pub last_known_target: Option<Sighting>,
    /// Written by perception every tick.
    pub target_visible: bool,
    /// Written by perception every tick; 0 when nothing was seen.
    pub visible_confidence: f32,
    pub suspicion: Suspicion,
    pub heard: Option<HeardSound>,
    pub known_resources: BTreeMap<ObjectId, ResourceSighting>,
    /// Resource currently being walked to.
    pub target_resource: Option<ObjectId>,
    /// Index into the patrol route.
    pub waypoint_index: usize,
    /// Set when an intel exchange delivered a fresher target sighting.
    pub intel_received: bool,
}

impl AgentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` if `key` holds a non-default value.
    pub fn has(&self, key: MemoryKey) -> bool {
        match key {
            MemoryKey::Path => self.path.is_some(),
            MemoryKey::LastKnownTarget => self.last_known_target.is_some(),
            MemoryKey::TargetVisible => self.target_visible,
            MemoryKey::VisibleConfidence => self.visible_confidence > 0.0,
            MemoryKey::Suspicion => self.suspicion.is_active(),
            MemoryKey::Heard => self.heard.is_some(),
            MemoryKey::KnownResources => !self.known_resources.is_empty(),
            MemoryKey::TargetResource => self.target_resource.is_some(),
            MemoryKey::WaypointIndex => self.waypoint_index != 0,
            MemoryKey::IntelReceived => self.intel_received,
        }
    }

    /// Reset `key` to its default.
    pub fn forget(&mut self, key: MemoryKey) {
        match key {
            MemoryKey::Path => self.clear_path(),
            MemoryKey::LastKnownTarget => self.last_known_target = None,
            MemoryKey::TargetVisible => self.target_visible = false,
            MemoryKey::VisibleConfidence => self.visible_confidence = 0.0,
            MemoryKey::Suspicion => self.suspicion.clear(),
            MemoryKey::Heard => self.heard = None,
            MemoryKey::KnownResources => self.known_resources.clear(),
            MemoryKey::TargetResource => self.target_resource = None,
            MemoryKey::WaypointIndex => self.waypoint_index = 0,
            MemoryKey::IntelReceived => self.intel_received = false,
        }
    }

    // ── Path ──────────────────────────────────────────────────────────────

    /// Replace the current path and restart it from its first waypoint.
    pub fn set_path(&mut self, path: Option<Path>) {
        self.path = path;
        self.path_index = 0;
    }

    pub fn clear_path(&mut self) {
        self.set_path(None);
    }

    /// The waypoint currently being walked to.
    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.path.as_ref().and_then(|p| p.get(self.path_index))
    }

    pub fn advance_path(&mut self) {
        self.path_index += 1;
    }

    /// `true` if there is a path and every waypoint of it has been reached.
    pub fn path_completed(&self) -> bool {
        self.path.as_ref().is_some_and(|p| self.path_index >= p.len())
    }

    /// `true` if there is nothing left to walk: no path, or a completed one.
    pub fn path_exhausted(&self) -> bool {
        self.path.as_ref().is_none_or(|p| self.path_index >= p.len())
    }

    // ── Target ────────────────────────────────────────────────────────────

    pub fn record_sighting(&mut self, position: Vec2, now: SimTime) {
        self.last_known_target = Some(Sighting { position, time: now });
    }

    /// Seconds since the last known target sighting.
    pub fn sighting_age(&self, now: SimTime) -> Option<f32> {
        self.last_known_target.map(|s| now.since(s.time))
    }

    // ── Resources ─────────────────────────────────────────────────────────

    /// Note a resource at `position`.  A resource already known keeps its
    /// original discovery time; only its position is refreshed.
    pub fn remember_resource(&mut self, id: ObjectId, position: Vec2, now: SimTime) -> bool {
        match self.known_resources.get_mut(&id) {
            Some(entry) => {
                entry.position = position;
                false
            }
            None => {
                self.known_resources.insert(id, ResourceSighting { position, discovered: now });
                true
            }
        }
    }

    pub fn forget_resource(&mut self, id: ObjectId) {
        self.known_resources.remove(&id);
        if self.target_resource == Some(id) {
            self.target_resource = None;
        }
    }

    /// Drop resources older than `timeout` seconds or for which `exists`
    /// returns `false`.  Returns how many were dropped.
    pub fn prune_resources<F>(&mut self, now: SimTime, timeout: f32, exists: F) -> usize
    where
        F: Fn(ObjectId) -> bool,
    {
        let before = self.known_resources.len();
        self.known_resources
            .retain(|&id, s| exists(id) && now.since(s.discovered) <= timeout);
        if let Some(target) = self.target_resource {
            if !self.known_resources.contains_key(&target) {
                self.target_resource = None;
            }
        }
        before - self.known_resources.len()
    }

    /// The remembered resource nearest to `from` for which `exists` holds.
    /// Ties go to the lower `ObjectId`.
    pub fn closest_resource<F>(&self, from: Vec2, exists: F) -> Option<(ObjectId, ResourceSighting)>
    where
        F: Fn(ObjectId) -> bool,
    {
        let mut best: Option<(ObjectId, ResourceSighting, f32)> = None;
        for (&id, &s) in &self.known_resources {
            if !exists(id) {
                continue;
            }
            let d = from.distance(s.position);
            if best.is_none_or(|(_, _, bd)| d < bd) {
                best = Some((id, s, d));
            }
        }
        best.map(|(id, s, _)| (id, s))
    }
}
