//! The `Sim` struct and its tick loop.

use std::collections::BTreeSet;

use sn_acoustic::{AcousticPropagator, HearingReceiver, Registration, SoundEvent};
use sn_agent::{AgentRngs, AgentStore, AgentView, DecideInput};
use sn_core::{AgentId, ObjectId, ResourceView, SimClock, SimConfig, TargetView, Tick, Vec2};
use sn_memory::IntelExchange;
use sn_perception::PerceptionContext;
use sn_spatial::Pathfinder;
use tracing::{debug, info};

use crate::{AgentIndex, SceneWorld, SimObserver, TickSummary};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<P>` holds all simulation state and drives the phased tick loop:
///
/// 1. **Sense**: perception for every guard, then deterministic sightings of
///    resources (remembered) and peers (collected).
/// 2. **Share**: every mutually visible pair prunes and reconciles intel.
/// 3. **Decide**: each controller picks a behaviour and re-plans if due.
/// 4. **Move**: path following; resource pickups resolved by the world.
/// 5. **Timers**: suspicion countdown, resource memory pruning, clock.
///
/// Every phase visits guards in ascending `AgentId` order.  Sounds are
/// delivered synchronously whenever [`Sim::emit`] is called.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: Pathfinder> {
    pub config: SimConfig,
    pub clock: SimClock,
    pub agents: AgentStore,
    pub rngs: AgentRngs,
    pub world: SceneWorld,
    pub pathfinder: P,
    pub propagator: AcousticPropagator,
    pub(crate) registrations: Vec<Option<Registration>>,
    pub(crate) index: AgentIndex,
}

impl<P: Pathfinder> Sim<P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        info!(agents = self.agents.count, end = self.config.end_tick().0, "simulation start");
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(tick = self.clock.current_tick.0, "simulation end");
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Process one tick and advance the clock.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> TickSummary {
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);

        let sightings = self.sense();
        let mut summary = TickSummary {
            exchanges: self.share(tick, &sightings, observer),
            ..TickSummary::default()
        };
        summary.pursuing = self.decide(tick, observer);
        summary.pickups = self.advance_agents();
        self.tick_timers();

        observer.on_tick_end(tick, &summary);
        self.clock.advance();
        summary
    }

    pub fn now_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.agent_ids()
    }

    pub fn agent(&self, id: AgentId) -> Option<AgentView<'_>> {
        self.agents.view(id)
    }

    pub fn set_target_position(&mut self, position: Vec2) {
        self.world.set_target_position(position);
    }

    /// Propagate `event` to every registered listener now.  Returns the
    /// number of guards it reached.
    pub fn emit(&mut self, event: SoundEvent) -> usize {
        let mut ears = Ears { agents: &mut self.agents };
        let delivered = self.propagator.emit(&event, &self.world, &mut ears);
        debug!(kind = %event.kind, source = %event.source, delivered, "sound emitted");
        delivered
    }

    /// Attach or detach `agent` from sound propagation.  Detaching drops its
    /// registration.
    pub fn set_listening(&mut self, agent: AgentId, listening: bool) {
        let Some(slot) = self.registrations.get_mut(agent.index()) else { return };
        match (listening, slot.is_some()) {
            (true, false) => *slot = Some(self.propagator.registry().register(agent)),
            (false, true) => *slot = None,
            _ => {}
        }
    }

    pub fn is_listening(&self, agent: AgentId) -> bool {
        self.propagator.registry().contains(agent)
    }

    // ── Phases ────────────────────────────────────────────────────────────

    /// Perception, resource sightings and peer sightings.  Returns the set
    /// of `(seer, seen)` pairs.
    fn sense(&mut self) -> BTreeSet<(AgentId, AgentId)> {
        let now = self.clock.now();
        let target = self.world.perception_target();
        let resources = self.world.resources();
        self.index.rebuild(&self.agents.pose);

        let store = &mut self.agents;
        let world = &self.world;
        let mut sightings = BTreeSet::new();

        for i in 0..store.count {
            let id = AgentId(i as u32);
            let pose = store.pose[i];
            let ctx = PerceptionContext { now, pursuing: store.controller[i].is_chasing() };
            let engine = &mut store.perception[i];
            let memory = &mut store.memory[i];
            engine.evaluate(&pose, target.as_ref(), world, memory, &ctx, self.rngs.get_mut(id));

            for &(object, position) in &resources {
                if engine.can_see(&pose, position, object, world)
                    && memory.remember_resource(object, position, now)
                {
                    debug!(agent = %id, resource = %object, %position, "resource spotted");
                }
            }

            let sight = engine.sight();
            let reach = sight.view_distance.max(sight.back_distance);
            for other in self.index.within(pose.position, reach) {
                if other == id {
                    continue;
                }
                let j = other.index();
                if engine.can_see(&pose, store.pose[j].position, store.body[j], world) {
                    sightings.insert((id, other));
                }
            }
        }
        sightings
    }

    /// Reconcile every mutually visible pair once.  Returns the number of
    /// exchanges that changed something.
    fn share<O: SimObserver>(
        &mut self,
        tick:      Tick,
        sightings: &BTreeSet<(AgentId, AgentId)>,
        observer:  &mut O,
    ) -> usize {
        let now = self.clock.now();
        let world = &self.world;
        let mut exchanges = 0;

        for &(a, b) in sightings {
            if a >= b || !sightings.contains(&(b, a)) {
                continue;
            }
            let timeout_a = self.agents.controller[a.index()].config().resource_memory_timeout;
            let timeout_b = self.agents.controller[b.index()].config().resource_memory_timeout;
            let Some((ma, mb)) = self.agents.memory_pair_mut(a, b) else { continue };
            let exists = |id: ObjectId| world.resource_exists(id);
            ma.prune_resources(now, timeout_a, exists);
            mb.prune_resources(now, timeout_b, exists);

            let report = IntelExchange::reconcile(ma, mb);
            if !report.is_empty() {
                debug!(%a, %b, ?report, "intel shared");
                observer.on_intel_shared(tick, a, b, &report);
                exchanges += 1;
            }
        }
        exchanges
    }

    fn decide<O: SimObserver>(&mut self, tick: Tick, observer: &mut O) -> usize {
        let now = self.clock.now();
        let dt = self.config.tick_duration_secs;
        let target = self.world.target().map(|(_, p)| p);
        let store = &mut self.agents;
        let mut pursuing = 0;

        for i in 0..store.count {
            let input = DecideInput {
                now,
                dt,
                pose: store.pose[i],
                health: store.health[i],
                target,
            };
            let output = store.controller[i].decide(
                &input,
                &mut store.memory[i],
                &self.world.grid,
                &self.pathfinder,
                &self.world,
            );
            if output.state.is_pursuing() {
                pursuing += 1;
            }
            observer.on_agent_state(tick, AgentId(i as u32), &output);
        }
        pursuing
    }

    /// Walk every guard and resolve pickups.  Returns the pickup count.
    fn advance_agents(&mut self) -> usize {
        let dt = self.config.tick_duration_secs;
        let store = &mut self.agents;
        let mut pickups = 0;

        for i in 0..store.count {
            store.controller[i].advance(&mut store.pose[i], &mut store.memory[i], dt);
            if let Some((object, resource)) = self.world.take_resource_at(store.pose[i].position) {
                store.health[i].heal(resource.heal);
                store.memory[i].forget_resource(object);
                debug!(agent = i, resource = %object, health = store.health[i].current, "resource picked up");
                pickups += 1;
            }
        }
        pickups
    }

    fn tick_timers(&mut self) {
        let now = self.clock.now();
        let dt = self.config.tick_duration_secs;
        let world = &self.world;
        let store = &mut self.agents;

        for i in 0..store.count {
            let timeout = store.controller[i].config().resource_memory_timeout;
            let memory = &mut store.memory[i];
            memory.suspicion.tick(dt);
            memory.prune_resources(now, timeout, |id| world.resource_exists(id));
        }
    }
}

// ── Hearing adapter ───────────────────────────────────────────────────────────

/// Routes propagator callbacks to the guards' controllers and memories.
struct Ears<'a> {
    agents: &'a mut AgentStore,
}

impl HearingReceiver for Ears<'_> {
    fn listener_position(&self, listener: AgentId) -> Option<Vec2> {
        self.agents.pose.get(listener.index()).map(|p| p.position)
    }

    fn on_hear(&mut self, listener: AgentId, event: &SoundEvent, volume: f32) {
        let i = listener.index();
        let store = &mut *self.agents;
        if let (Some(controller), Some(memory)) = (store.controller.get(i), store.memory.get_mut(i)) {
            controller.on_hear(event, volume, memory);
        }
    }
}
