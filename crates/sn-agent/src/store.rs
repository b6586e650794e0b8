//! Guard storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! RNGs live apart from the store so the sense phase can hold
//! `&mut AgentRngs` alongside mutable borrows of individual store columns.

use sn_core::{AgentId, AgentRng, ObjectId, Pose};
use sn_memory::AgentMemory;
use sn_perception::PerceptionEngine;
use sn_spatial::Path;

use crate::{AgentController, AgentState, Health};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, seeded from the global seed.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// One stream per agent id in `0..count`, as `AgentStoreBuilder` makes them.
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for every guard.
///
/// Every `Vec` has exactly `count` elements and `AgentId` is the index into
/// all of them.
pub struct AgentStore {
    pub count: usize,
    pub pose: Vec<Pose>,
    /// Body id used when another guard's sight ray hits this one.
    pub body: Vec<ObjectId>,
    pub health: Vec<Health>,
    pub memory: Vec<AgentMemory>,
    pub perception: Vec<PerceptionEngine>,
    pub controller: Vec<AgentController>,
}

impl AgentStore {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    /// The guard whose body is `object`, if any.
    pub fn agent_by_body(&self, object: ObjectId) -> Option<AgentId> {
        self.body.iter().position(|&b| b == object).map(|i| AgentId(i as u32))
    }

    /// Read-only flags for one guard.
    pub fn view(&self, agent: AgentId) -> Option<AgentView<'_>> {
        self.contains(agent).then(|| AgentView { store: self, index: agent.index() })
    }

    /// Disjoint mutable borrows of two guards' memories.
    ///
    /// Returns `None` if `a == b` or either is out of range.
    pub fn memory_pair_mut(&mut self, a: AgentId, b: AgentId) -> Option<(&mut AgentMemory, &mut AgentMemory)> {
        let (i, j) = (a.index(), b.index());
        if i == j || i >= self.count || j >= self.count {
            return None;
        }
        if i < j {
            let (lo, hi) = self.memory.split_at_mut(j);
            Some((&mut lo[i], &mut hi[0]))
        } else {
            let (lo, hi) = self.memory.split_at_mut(i);
            Some((&mut hi[0], &mut lo[j]))
        }
    }

    pub(crate) fn with_capacity(count: usize) -> Self {
        Self {
            count: 0,
            pose: Vec::with_capacity(count),
            body: Vec::with_capacity(count),
            health: Vec::with_capacity(count),
            memory: Vec::with_capacity(count),
            perception: Vec::with_capacity(count),
            controller: Vec::with_capacity(count),
        }
    }
}

/// Borrowed read-only view of one guard.
#[derive(Copy, Clone)]
pub struct AgentView<'a> {
    store: &'a AgentStore,
    index: usize,
}

impl<'a> AgentView<'a> {
    pub fn id(&self) -> AgentId {
        AgentId(self.index as u32)
    }

    pub fn pose(&self) -> Pose {
        self.store.pose[self.index]
    }

    pub fn health(&self) -> Health {
        self.store.health[self.index]
    }

    pub fn state(&self) -> AgentState {
        self.store.controller[self.index].state()
    }

    pub fn is_chasing(&self) -> bool {
        self.store.controller[self.index].is_chasing()
    }

    pub fn is_suspicious(&self) -> bool {
        self.store.controller[self.index].is_suspicious()
    }

    pub fn visible_confidence(&self) -> f32 {
        self.store.controller[self.index].visible_confidence()
    }

    pub fn current_path(&self) -> Option<&'a Path> {
        self.store.memory[self.index].path.as_ref()
    }

    pub fn memory(&self) -> &'a AgentMemory {
        &self.store.memory[self.index]
    }
}
