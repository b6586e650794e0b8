//! patrol: three guards, one intruder, two health packs.
//!
//! Loads an embedded ASCII map and route CSV, gives each guard a different
//! perception strategy, then walks an intruder around a fixed loop that
//! leaves footsteps every half second.  Set `RUST_LOG=debug` to watch state
//! changes, intel exchanges and pickups as they happen.

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sn_acoustic::{SoundEvent, SoundKind};
use sn_agent::{AgentSpec, AgentStoreBuilder, ControllerOutput, Health};
use sn_core::{AgentId, SimConfig, Tick, Vec2};
use sn_perception::{PerceptionStrategy, SimpleRadiusParams, VisionConeParams};
use sn_sim::{SimBuilder, SimObserver, TickSummary, load_routes_reader, parse_map};
use sn_spatial::AStarPathfinder;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:               u64 = 7;
const TICK_DURATION_SECS: f32 = 0.1;
const SIM_SECS:           u64 = 60;
const INTRUDER_SPEED:     f32 = 1.5;
const FOOTSTEP_EVERY:     u64 = 5; // ticks
const FOOTSTEP_VOLUME:    f32 = 1.5;

// ── Scenario ──────────────────────────────────────────────────────────────────

const MAP: &str = "\
############
#G.........#
#..##..##..#
#..##P.##.H#
#..........#
#.G..##..G.#
#H...##....#
############
";

const ROUTES_CSV: &str = "\
agent_id,order,x,y\n\
0,0,1.5,1.5\n\
0,1,10.5,1.5\n\
0,2,10.5,4.5\n\
0,3,1.5,4.5\n\
1,0,2.5,5.5\n\
1,1,2.5,1.5\n\
2,0,9.5,5.5\n\
2,1,9.5,6.5\n\
2,2,7.5,6.5\n\
";

/// The intruder's loop, all along open rows and columns.
const INTRUDER_LOOP: [(f32, f32); 4] = [(5.5, 4.5), (9.5, 4.5), (9.5, 1.5), (5.5, 1.5)];

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    /// Guard-ticks spent in each behaviour.
    states:    BTreeMap<&'static str, u64>,
    exchanges: usize,
    pickups:   usize,
    alarm:     Option<Tick>,
}

impl SimObserver for Tally {
    fn on_agent_state(&mut self, tick: Tick, _agent: AgentId, output: &ControllerOutput) {
        *self.states.entry(output.state.label()).or_default() += 1;
        if output.state.is_pursuing() && self.alarm.is_none() {
            self.alarm = Some(tick);
        }
    }

    fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
        self.exchanges += summary.exchanges;
        self.pickups += summary.pickups;
    }
}

// ── Intruder ──────────────────────────────────────────────────────────────────

struct Intruder {
    position: Vec2,
    next:     usize,
}

impl Intruder {
    fn new(start: Vec2) -> Self {
        Self { position: start, next: 0 }
    }

    fn walk(&mut self, dt: f32) {
        let mut budget = INTRUDER_SPEED * dt;
        while budget > 0.0 {
            let (x, y) = INTRUDER_LOOP[self.next];
            let goal = Vec2::new(x, y);
            let distance = self.position.distance(goal);
            if distance <= budget {
                self.position = goal;
                budget -= distance;
                self.next = (self.next + 1) % INTRUDER_LOOP.len();
            } else {
                self.position = self.position + (goal - self.position) * (budget / distance);
                budget = 0.0;
            }
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Scenario.
    let scenario = parse_map(MAP, 1.0)?;
    let routes = load_routes_reader(ROUTES_CSV.as_bytes(), scenario.guards.len())?;
    let start = scenario.target.unwrap_or(Vec2::new(5.5, 3.5));
    info!(
        guards = scenario.guards.len(),
        packs = scenario.resources.len(),
        width = scenario.grid.width(),
        height = scenario.grid.height(),
        "scenario loaded"
    );

    // 2. Guards: one of each sampling style; the third starts wounded.
    let mut specs = scenario.agent_specs(&routes, &AgentSpec::default());
    if let Some(spec) = specs.get_mut(1) {
        spec.strategy = PerceptionStrategy::VisionCone(VisionConeParams::default());
    }
    if let Some(spec) = specs.get_mut(2) {
        spec.strategy = PerceptionStrategy::SimpleRadius(SimpleRadiusParams { radius: 4.0, sweep_rays: 0 });
        spec.health = Health::new(40.0, 100.0);
    }
    let (store, rngs) = AgentStoreBuilder::new(SEED).agents(specs).build();

    // 3. Sim.
    let config = SimConfig {
        tick_duration_secs: TICK_DURATION_SECS,
        total_ticks:        (SIM_SECS as f32 / TICK_DURATION_SECS).round() as u64,
        seed:               SEED,
    };
    let total_ticks = config.total_ticks;
    let mut sim = SimBuilder::new(config, store, rngs, scenario.world(), AStarPathfinder::eight()).build()?;

    // 4. Run, moving the intruder between ticks.
    let mut intruder = Intruder::new(start);
    let mut tally = Tally::default();
    for tick in 0..total_ticks {
        intruder.walk(TICK_DURATION_SECS);
        sim.set_target_position(intruder.position);
        if tick % FOOTSTEP_EVERY == 0 {
            sim.emit(SoundEvent::new(intruder.position, FOOTSTEP_VOLUME, SoundKind::Footstep));
        }
        sim.step(&mut tally);
    }
    tally.on_sim_end(sim.now_tick());

    // 5. Report.
    println!("=== patrol: {SIM_SECS} s, seed {SEED} ===");
    match tally.alarm {
        Some(t) => println!("First pursuit at {t}"),
        None => println!("The intruder was never spotted"),
    }
    println!("Intel exchanges: {}  |  Pickups: {}", tally.exchanges, tally.pickups);
    for (label, ticks) in &tally.states {
        println!("  {label:<16} {ticks:>6} guard-ticks");
    }
    for id in sim.agent_ids() {
        let Some(view) = sim.agent(id) else { continue };
        println!(
            "  {id}: {} at {}  health {:.0}/{:.0}",
            view.state(),
            view.pose().position,
            view.health().current,
            view.health().max,
        );
    }
    Ok(())
}
