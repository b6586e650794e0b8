//! Fluent builder for constructing a [`Sim`].

use sn_acoustic::{AcousticPropagator, ListenerRegistry, PropagatorConfig};
use sn_agent::{AgentRngs, AgentStore};
use sn_core::{AgentId, SimConfig};
use sn_spatial::Pathfinder;

use crate::{AgentIndex, SceneWorld, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick duration, total ticks, seed
/// - [`AgentStore`] + [`AgentRngs`]: from [`sn_agent::AgentStoreBuilder`]
/// - [`SceneWorld`]: walls, target and resources
/// - `P: Pathfinder`: e.g. [`sn_spatial::AStarPathfinder`]
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                         |
/// |--------------------------|---------------------------------|
/// | `.propagator(cfg)`       | `PropagatorConfig::default()`   |
/// | `.deaf(ids)`             | every guard listens             |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(seed).agents(specs).build();
/// let mut sim = SimBuilder::new(config, store, rngs, world, AStarPathfinder::eight())
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<P: Pathfinder> {
    config:     SimConfig,
    agents:     AgentStore,
    rngs:       AgentRngs,
    world:      SceneWorld,
    pathfinder: P,
    propagator: PropagatorConfig,
    deaf:       Vec<AgentId>,
}

impl<P: Pathfinder> SimBuilder<P> {
    pub fn new(
        config:     SimConfig,
        agents:     AgentStore,
        rngs:       AgentRngs,
        world:      SceneWorld,
        pathfinder: P,
    ) -> Self {
        Self {
            config,
            agents,
            rngs,
            world,
            pathfinder,
            propagator: PropagatorConfig::default(),
            deaf: Vec::new(),
        }
    }

    pub fn propagator(mut self, config: PropagatorConfig) -> Self {
        self.propagator = config;
        self
    }

    /// Guards that start without a listener registration.
    pub fn deaf(mut self, agents: impl IntoIterator<Item = AgentId>) -> Self {
        self.deaf.extend(agents);
        self
    }

    /// Validate inputs, register listeners and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        let count = self.agents.count;

        let dt = self.config.tick_duration_secs;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::Config(format!(
                "tick duration must be positive, got {dt}"
            )));
        }
        if self.rngs.len() != count {
            return Err(SimError::AgentCountMismatch {
                expected: count,
                got:      self.rngs.len(),
                what:     "agent RNGs",
            });
        }

        let grid = &self.world.grid;
        for id in self.agents.agent_ids() {
            let position = self.agents.pose[id.index()].position;
            if !grid.is_walkable_at(position) {
                return Err(SimError::AgentOutsideGrid { agent: id, position });
            }
            let route = self.agents.controller[id.index()].route();
            if let Some((index, &position)) = route.iter().enumerate().find(|(_, p)| !grid.is_walkable_at(**p)) {
                return Err(SimError::WaypointOutsideGrid { agent: id, index, position });
            }
        }

        let registry = ListenerRegistry::new();
        let registrations = self
            .agents
            .agent_ids()
            .map(|id| (!self.deaf.contains(&id)).then(|| registry.register(id)))
            .collect();

        let mut index = AgentIndex::default();
        index.rebuild(&self.agents.pose);

        Ok(Sim {
            clock:         self.config.make_clock(),
            config:        self.config,
            agents:        self.agents,
            rngs:          self.rngs,
            world:         self.world,
            pathfinder:    self.pathfinder,
            propagator:    AcousticPropagator::new(registry, self.propagator),
            registrations,
            index,
        })
    }
}
