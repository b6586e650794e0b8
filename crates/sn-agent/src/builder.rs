//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use sn_agent::{AgentSpec, AgentStoreBuilder};
//! use sn_core::{Pose, Vec2};
//!
//! let (store, rngs) = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .agent(AgentSpec::at(Pose::new(Vec2::new(1.5, 1.5), 0.0)))
//!     .agent(AgentSpec::at(Pose::new(Vec2::new(4.5, 1.5), 180.0)))
//!     .build();
//!
//! assert_eq!(store.count, 2);
//! assert_eq!(rngs.len(), 2);
//! ```

use sn_core::{ObjectId, Pose, Vec2};
use sn_memory::AgentMemory;
use sn_perception::{PerceptionEngine, PerceptionStrategy, SightCone};

use crate::{AgentConfig, AgentController, AgentRngs, AgentStore, Health};

/// Body ids handed out to guards start here, clear of scene objects.
pub const AGENT_BODY_BASE: u32 = 1 << 24;

/// Everything needed to spawn one guard.
#[derive(Clone, Debug, Default)]
pub struct AgentSpec {
    pub pose: Pose,
    pub route: Vec<Vec2>,
    pub config: AgentConfig,
    pub strategy: PerceptionStrategy,
    pub sight: SightCone,
    pub health: Health,
}

impl AgentSpec {
    pub fn at(pose: Pose) -> Self {
        Self { pose, ..Self::default() }
    }

    pub fn with_route(mut self, route: Vec<Vec2>) -> Self {
        self.route = route;
        self
    }

    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_strategy(mut self, strategy: PerceptionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_health(mut self, health: Health) -> Self {
        self.health = health;
        self
    }
}

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
pub struct AgentStoreBuilder {
    seed: u64,
    specs: Vec<AgentSpec>,
}

impl AgentStoreBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed, specs: Vec::new() }
    }

    /// Append a guard.  Ids are assigned in call order starting at 0.
    pub fn agent(mut self, spec: AgentSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn agents(mut self, specs: impl IntoIterator<Item = AgentSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[AgentSpec] {
        &self.specs
    }

    pub fn build(self) -> (AgentStore, AgentRngs) {
        let count = self.specs.len();
        let mut store = AgentStore::with_capacity(count);
        for (i, spec) in self.specs.into_iter().enumerate() {
            store.pose.push(spec.pose);
            store.body.push(ObjectId(AGENT_BODY_BASE + i as u32));
            store.health.push(spec.health);
            store.memory.push(AgentMemory::new());
            store.perception.push(PerceptionEngine::new(spec.strategy).with_sight(spec.sight));
            store.controller.push(AgentController::new(spec.config, spec.route));
        }
        store.count = count;
        (store, AgentRngs::new(count, self.seed))
    }
}
