//! Integration tests for sn-sim.

use sn_agent::{AgentSpec, AgentStoreBuilder, Health};
use sn_core::{AgentId, Pose, SimConfig, Tick, Vec2};
use sn_memory::ExchangeReport;
use sn_perception::{PerceptionStrategy, SimpleRadiusParams};
use sn_spatial::{AStarPathfinder, TileGrid};

use crate::{NoopObserver, SceneWorld, Sim, SimBuilder, SimObserver, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig { tick_duration_secs: 0.1, total_ticks, seed: 42 }
}

fn open_world() -> SceneWorld {
    SceneWorld::new(TileGrid::new(10, 10, 1.0).unwrap())
}

/// An all-seeing guard, so scenarios do not depend on sampling noise.
fn guard(x: f32, y: f32, heading: f32) -> AgentSpec {
    AgentSpec::at(Pose::new(Vec2::new(x, y), heading)).with_strategy(PerceptionStrategy::Omniscient)
}

fn build(world: SceneWorld, specs: Vec<AgentSpec>, total_ticks: u64) -> Sim<AStarPathfinder> {
    let (store, rngs) = AgentStoreBuilder::new(42).agents(specs).build();
    SimBuilder::new(test_config(total_ticks), store, rngs, world, AStarPathfinder::eight())
        .build()
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    starts: usize,
    states: usize,
    shared: Vec<(Tick, AgentId, AgentId)>,
    pickups: usize,
    ended: Option<Tick>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_agent_state(&mut self, _tick: Tick, _agent: AgentId, _output: &sn_agent::ControllerOutput) {
        self.states += 1;
    }

    fn on_intel_shared(&mut self, tick: Tick, a: AgentId, b: AgentId, _report: &ExchangeReport) {
        self.shared.push((tick, a, b));
    }

    fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
        self.pickups += summary.pickups;
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use sn_agent::AgentRngs;

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_and_registers_every_guard() {
        let sim = build(open_world(), vec![guard(1.5, 1.5, 0.0), guard(3.5, 3.5, 0.0)], 10);
        assert_eq!(sim.agents.count, 2);
        assert_eq!(sim.propagator.registry().len(), 2);
        assert!(sim.is_listening(AgentId(0)));
        assert!(sim.is_listening(AgentId(1)));
        assert_eq!(sim.now_tick(), Tick(0));
    }

    #[test]
    fn deaf_guards_are_not_registered() {
        let (store, rngs) = AgentStoreBuilder::new(1)
            .agents([guard(1.5, 1.5, 0.0), guard(3.5, 3.5, 0.0)])
            .build();
        let sim = SimBuilder::new(test_config(1), store, rngs, open_world(), AStarPathfinder::eight())
            .deaf([AgentId(1)])
            .build()
            .unwrap();
        assert!(sim.is_listening(AgentId(0)));
        assert!(!sim.is_listening(AgentId(1)));
    }

    #[test]
    fn rng_count_mismatch_errors() {
        let (store, _) = AgentStoreBuilder::new(1)
            .agents([guard(1.5, 1.5, 0.0), guard(3.5, 3.5, 0.0)])
            .build();
        let result = SimBuilder::new(test_config(1), store, AgentRngs::new(1, 1), open_world(), AStarPathfinder::eight())
            .build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { expected: 2, got: 1, .. })));
    }

    #[test]
    fn non_positive_tick_duration_errors() {
        let (store, rngs) = AgentStoreBuilder::new(1).agent(guard(1.5, 1.5, 0.0)).build();
        let config = SimConfig { tick_duration_secs: 0.0, ..test_config(1) };
        let result = SimBuilder::new(config, store, rngs, open_world(), AStarPathfinder::eight()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn spawn_outside_grid_errors() {
        let (store, rngs) = AgentStoreBuilder::new(1).agent(guard(20.0, 1.5, 0.0)).build();
        let result = SimBuilder::new(test_config(1), store, rngs, open_world(), AStarPathfinder::eight()).build();
        assert!(matches!(result, Err(SimError::AgentOutsideGrid { agent: AgentId(0), .. })));
    }

    #[test]
    fn waypoint_in_wall_errors() {
        let grid = TileGrid::from_ascii("....\n.#..\n....", 1.0).unwrap();
        let spec = guard(0.5, 0.5, 0.0).with_route(vec![Vec2::new(3.5, 0.5), Vec2::new(1.5, 1.5)]);
        let (store, rngs) = AgentStoreBuilder::new(1).agent(spec).build();
        let result = SimBuilder::new(test_config(1), store, rngs, SceneWorld::new(grid), AStarPathfinder::eight())
            .build();
        assert!(matches!(result, Err(SimError::WaypointOutsideGrid { index: 1, .. })));
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn run_stops_at_end_tick_and_reports() {
        let mut sim = build(open_world(), vec![guard(1.5, 1.5, 0.0), guard(3.5, 3.5, 0.0)], 5);
        let mut rec = Recorder::default();
        sim.run(&mut rec);
        assert_eq!(sim.now_tick(), Tick(5));
        assert_eq!(rec.starts, 5);
        assert_eq!(rec.states, 10);
        assert_eq!(rec.ended, Some(Tick(5)));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = build(open_world(), vec![guard(1.5, 1.5, 0.0)], 2);
        sim.run_ticks(4, &mut NoopObserver);
        assert_eq!(sim.now_tick(), Tick(4));
    }

    #[test]
    fn guard_without_route_idles() {
        let mut sim = build(open_world(), vec![guard(1.5, 1.5, 0.0)], 10);
        sim.run(&mut NoopObserver);
        let view = sim.agent(AgentId(0)).unwrap();
        assert_eq!(view.state(), sn_agent::AgentState::Idle);
        assert_eq!(view.pose().position, Vec2::new(1.5, 1.5));
    }

    #[test]
    fn same_seed_same_run() {
        let make = || {
            let mut world = open_world();
            world.set_target_position(Vec2::new(7.5, 7.5));
            let specs = vec![
                AgentSpec::at(Pose::new(Vec2::new(1.5, 1.5), 0.0))
                    .with_route(vec![Vec2::new(8.5, 1.5), Vec2::new(1.5, 1.5)]),
                AgentSpec::at(Pose::new(Vec2::new(1.5, 8.5), 0.0))
                    .with_route(vec![Vec2::new(8.5, 8.5), Vec2::new(1.5, 8.5)]),
            ];
            build(world, specs, 80)
        };
        let mut a = make();
        let mut b = make();
        a.run(&mut NoopObserver);
        b.run(&mut NoopObserver);
        assert_eq!(a.agents.pose, b.agents.pose);
        assert_eq!(a.agents.memory, b.agents.memory);
    }
}

// ── Pursuit ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pursuit_tests {
    use sn_agent::AgentState;

    use super::*;

    #[test]
    fn visible_target_is_pursued() {
        let mut world = open_world();
        world.set_target_position(Vec2::new(8.5, 1.5));
        let mut sim = build(world, vec![guard(1.5, 1.5, 0.0)], 40);

        let summary = sim.step(&mut NoopObserver);
        assert_eq!(summary.pursuing, 1);
        let view = sim.agent(AgentId(0)).unwrap();
        assert!(view.is_chasing());
        assert!(matches!(view.state(), AgentState::Pursuing { direct: true, .. }));
        assert_eq!(view.state().label(), "pursuing");

        sim.run(&mut NoopObserver);
        let pos = sim.agent(AgentId(0)).unwrap().pose().position;
        assert!(pos.distance(Vec2::new(8.5, 1.5)) <= 0.5, "guard ended at {pos}");
    }

    #[test]
    fn lost_target_returns_to_patrol() {
        let mut world = open_world();
        world.set_target_position(Vec2::new(6.5, 1.5));
        let spec = guard(1.5, 1.5, 0.0).with_route(vec![Vec2::new(1.5, 1.5)]);
        let mut sim = build(world, vec![spec], 200);

        sim.step(&mut NoopObserver);
        assert!(sim.agent(AgentId(0)).unwrap().is_chasing());

        sim.world.remove_target();
        sim.step(&mut NoopObserver);
        let view = sim.agent(AgentId(0)).unwrap();
        assert!(matches!(view.state(), AgentState::Pursuing { direct: false, .. }));
        assert_eq!(view.state().label(), "searching");

        sim.run_ticks(100, &mut NoopObserver);
        let view = sim.agent(AgentId(0)).unwrap();
        assert!(matches!(view.state(), AgentState::Patrolling { waypoint: 0 }));
        assert!(view.memory().last_known_target.is_none());
        assert!(!view.is_chasing());
    }
}

// ── Sound ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sound_tests {
    use sn_acoustic::{SoundEvent, SoundKind};
    use sn_agent::AgentState;

    use super::*;

    fn shot() -> SoundEvent {
        SoundEvent::new(Vec2::new(4.5, 1.5), 5.0, SoundKind::Gunshot)
    }

    #[test]
    fn heard_sound_is_investigated() {
        let mut sim = build(open_world(), vec![guard(1.5, 1.5, 0.0)], 10);
        assert_eq!(sim.emit(shot()), 1);
        sim.step(&mut NoopObserver);

        let view = sim.agent(AgentId(0)).unwrap();
        assert_eq!(view.state(), AgentState::Investigating { sound: Vec2::new(4.5, 1.5) });
        assert!(view.is_suspicious());
        assert!(!view.is_chasing());
    }

    #[test]
    fn detached_guard_hears_nothing() {
        let mut sim = build(open_world(), vec![guard(1.5, 1.5, 0.0)], 10);
        sim.set_listening(AgentId(0), false);
        assert!(!sim.is_listening(AgentId(0)));
        assert_eq!(sim.emit(shot()), 0);
        assert!(sim.agent(AgentId(0)).unwrap().memory().heard.is_none());

        sim.set_listening(AgentId(0), true);
        assert!(sim.is_listening(AgentId(0)));
        assert_eq!(sim.emit(shot()), 1);
        assert!(sim.agent(AgentId(0)).unwrap().memory().heard.is_some());
    }

    #[test]
    fn emitter_does_not_hear_itself() {
        let mut sim = build(open_world(), vec![guard(1.5, 1.5, 0.0), guard(3.5, 1.5, 0.0)], 10);
        assert_eq!(sim.emit(shot().from_agent(AgentId(1))), 1);
        assert!(sim.agent(AgentId(0)).unwrap().memory().heard.is_some());
        assert!(sim.agent(AgentId(1)).unwrap().memory().heard.is_none());
    }
}

// ── Intel sharing ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod intel_tests {
    use sn_agent::AgentState;
    use sn_perception::SightCone;

    use super::*;

    fn short_sighted(x: f32, y: f32, heading: f32) -> AgentSpec {
        AgentSpec::at(Pose::new(Vec2::new(x, y), heading))
            .with_strategy(PerceptionStrategy::SimpleRadius(SimpleRadiusParams { radius: 1.0, sweep_rays: 0 }))
    }

    #[test]
    fn facing_guards_share_target_sighting() {
        let mut world = open_world();
        world.set_target_position(Vec2::new(8.5, 5.5));
        let mut sim = build(world, vec![guard(2.5, 5.5, 0.0), short_sighted(5.5, 5.5, 180.0)], 10);
        let mut rec = Recorder::default();

        // Tick 0: the seer records its sighting, nothing to share yet.
        sim.step(&mut rec);
        assert!(rec.shared.is_empty());
        assert!(sim.agent(AgentId(1)).unwrap().memory().last_known_target.is_none());

        sim.step(&mut rec);
        assert_eq!(rec.shared, vec![(Tick(1), AgentId(0), AgentId(1))]);
        let b = sim.agent(AgentId(1)).unwrap();
        let learned = b.memory().last_known_target.unwrap();
        assert_eq!(learned.position, Vec2::new(8.5, 5.5));
        assert!(matches!(b.state(), AgentState::Pursuing { direct: false, .. }));
    }

    #[test]
    fn one_sided_sighting_shares_nothing() {
        let mut world = open_world();
        world.set_target_position(Vec2::new(8.5, 5.5));
        // The second guard faces away and the seer sits outside its rear
        // range.
        let blind_back = AgentSpec {
            sight: SightCone { back_distance: 1.0, ..SightCone::default() },
            ..short_sighted(6.5, 5.5, 0.0)
        };
        let mut sim = build(world, vec![guard(2.5, 5.5, 0.0), blind_back], 10);
        let mut rec = Recorder::default();
        sim.run_ticks(2, &mut rec);
        assert!(rec.shared.is_empty());
        assert!(sim.agent(AgentId(1)).unwrap().memory().last_known_target.is_none());
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resource_tests {
    use super::*;

    #[test]
    fn hurt_guard_fetches_seen_pack() {
        let mut world = open_world();
        let pack = world.add_resource(Vec2::new(5.5, 5.5));
        let spec = guard(2.5, 5.5, 0.0).with_health(Health::new(30.0, 100.0));
        let mut sim = build(world, vec![spec], 40);
        let mut rec = Recorder::default();

        sim.step(&mut rec);
        let view = sim.agent(AgentId(0)).unwrap();
        assert!(view.memory().known_resources.contains_key(&pack));
        assert_eq!(view.state(), sn_agent::AgentState::SeekingResource { resource: pack });

        sim.run(&mut rec);
        assert_eq!(rec.pickups, 1);
        assert_eq!(sim.world.resource_count(), 0);
        let view = sim.agent(AgentId(0)).unwrap();
        assert_eq!(view.health().current, 50.0);
        assert!(view.memory().known_resources.is_empty());
        assert!(view.memory().target_resource.is_none());
    }

    #[test]
    fn healthy_guard_only_remembers() {
        let mut world = open_world();
        let pack = world.add_resource(Vec2::new(5.5, 5.5));
        let mut sim = build(world, vec![guard(2.5, 5.5, 0.0)], 5);
        sim.run(&mut NoopObserver);
        let view = sim.agent(AgentId(0)).unwrap();
        assert!(view.memory().known_resources.contains_key(&pack));
        assert_eq!(view.state(), sn_agent::AgentState::Idle);
        assert_eq!(sim.world.resource_count(), 1);
    }

    #[test]
    fn vanished_pack_is_forgotten() {
        let mut world = open_world();
        let pack = world.add_resource(Vec2::new(5.5, 5.5));
        let mut sim = build(world, vec![guard(2.5, 5.5, 0.0)], 5);
        sim.step(&mut NoopObserver);
        assert!(sim.agent(AgentId(0)).unwrap().memory().known_resources.contains_key(&pack));

        sim.world.remove_resource(pack);
        sim.step(&mut NoopObserver);
        assert!(sim.agent(AgentId(0)).unwrap().memory().known_resources.is_empty());
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world_tests {
    use sn_core::{LayerMask, Occlusion, ResourceView, TargetView};

    use super::*;
    use crate::TARGET_OBJECT;

    fn walled() -> SceneWorld {
        let grid = TileGrid::from_ascii(
            "........#.\n........#.\n........#.\n........#.\n........#.\n........#.",
            1.0,
        )
        .unwrap();
        let mut world = SceneWorld::new(grid);
        world.set_target_position(Vec2::new(5.5, 2.5));
        world
    }

    #[test]
    fn ray_stops_on_target_before_wall() {
        let world = walled();
        let dir = Vec2::new(1.0, 0.0);
        let hit = world.raycast(Vec2::new(1.5, 2.5), dir, 20.0, LayerMask::WALLS | LayerMask::TARGET).unwrap();
        assert_eq!(hit.object, TARGET_OBJECT);
        assert!((hit.distance - 3.7).abs() < 1e-4);

        let wall = world.raycast(Vec2::new(1.5, 2.5), dir, 20.0, LayerMask::WALLS).unwrap();
        assert_eq!(wall.object, TileGrid::WALL_OBJECT);
        assert!(wall.distance > 3.7);
    }

    #[test]
    fn overlaps_bodies_by_layer() {
        let mut world = walled();
        world.add_resource(Vec2::new(2.5, 4.5));
        assert!(world.overlaps(Vec2::new(5.6, 2.5), LayerMask::TARGET));
        assert!(!world.overlaps(Vec2::new(5.6, 2.5), LayerMask::RESOURCES));
        assert!(world.overlaps(Vec2::new(2.5, 4.9), LayerMask::RESOURCES));
        assert!(world.overlaps(Vec2::new(8.5, 0.5), LayerMask::WALLS));
    }

    #[test]
    fn resources_have_fresh_ids_and_are_taken_once() {
        let mut world = walled();
        let a = world.add_resource(Vec2::new(1.5, 1.5));
        let b = world.add_resource(Vec2::new(3.5, 3.5));
        assert_ne!(a, b);
        assert_ne!(a, TARGET_OBJECT);
        assert_eq!(world.resources().len(), 2);

        let (taken, resource) = world.take_resource_at(Vec2::new(3.8, 3.5)).unwrap();
        assert_eq!(taken, b);
        assert_eq!(resource.heal, 20.0);
        assert!(world.take_resource_at(Vec2::new(3.8, 3.5)).is_none());
        assert!(!world.resource_exists(b));
        assert!(world.resource_exists(a));
    }

    #[test]
    fn target_view_follows_moves() {
        let mut world = walled();
        assert_eq!(world.target(), Some((TARGET_OBJECT, Vec2::new(5.5, 2.5))));
        world.set_target_position(Vec2::new(1.5, 1.5));
        assert_eq!(world.target_body().unwrap().position, Vec2::new(1.5, 1.5));
        world.remove_target();
        assert!(world.target().is_none());
        assert!(world.perception_target().is_none());
    }
}

// ── Proximity ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod proximity_tests {
    use super::*;
    use crate::AgentIndex;

    #[test]
    fn within_returns_sorted_ids() {
        let poses = [
            Pose::new(Vec2::new(1.0, 0.0), 0.0),
            Pose::new(Vec2::new(9.0, 9.0), 0.0),
            Pose::new(Vec2::new(0.0, 0.5), 0.0),
        ];
        let mut index = AgentIndex::default();
        assert!(index.is_empty());
        index.rebuild(&poses);
        assert_eq!(index.len(), 3);
        assert_eq!(index.within(Vec2::new(0.0, 0.0), 2.0), vec![AgentId(0), AgentId(2)]);
        assert!(index.within(Vec2::new(5.0, 0.0), 1.0).is_empty());
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use super::*;
    use crate::{ScenarioError, load_routes_reader, parse_map};

    const MAP: &str = "\
########
#G....P#
#..##..#
#H...G.#
########
";

    #[test]
    fn markers_become_positions() {
        let s = parse_map(MAP, 1.0).unwrap();
        assert_eq!(s.guards, vec![Vec2::new(1.5, 1.5), Vec2::new(5.5, 3.5)]);
        assert_eq!(s.target, Some(Vec2::new(6.5, 1.5)));
        assert_eq!(s.resources, vec![Vec2::new(1.5, 3.5)]);
        assert!(s.grid.is_walkable_at(Vec2::new(1.5, 1.5)));
        assert!(!s.grid.is_walkable_at(Vec2::new(3.5, 2.5)));
    }

    #[test]
    fn second_target_is_rejected() {
        assert!(matches!(parse_map("#PP#", 1.0), Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn bad_map_character_is_a_map_error() {
        assert!(matches!(parse_map("#.?#", 1.0), Err(ScenarioError::Map(_))));
    }

    #[test]
    fn routes_grouped_and_sorted() {
        let csv = "agent_id,order,x,y\n1,1,6.5,3.5\n0,1,5.5,1.5\n0,0,1.5,1.5\n1,0,5.5,3.5\n";
        let routes = load_routes_reader(csv.as_bytes(), 3).unwrap();
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0], vec![Vec2::new(1.5, 1.5), Vec2::new(5.5, 1.5)]);
        assert_eq!(routes[1], vec![Vec2::new(5.5, 3.5), Vec2::new(6.5, 3.5)]);
        assert!(routes[2].is_empty());
    }

    #[test]
    fn route_for_missing_guard_errors() {
        let csv = "agent_id,order,x,y\n2,0,1.5,1.5\n";
        assert!(matches!(
            load_routes_reader(csv.as_bytes(), 2),
            Err(ScenarioError::UnknownAgent { agent_id: 2, guards: 2 })
        ));
    }

    #[test]
    fn malformed_row_errors() {
        let csv = "agent_id,order,x,y\n0,zero,1.5,1.5\n";
        assert!(matches!(load_routes_reader(csv.as_bytes(), 1), Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn scenario_builds_a_sim() {
        let scenario = parse_map(MAP, 1.0).unwrap();
        let routes = vec![
            vec![Vec2::new(5.5, 1.5), Vec2::new(1.5, 1.5)],
            vec![Vec2::new(5.5, 1.5)],
        ];
        let template = AgentSpec::default().with_strategy(PerceptionStrategy::Omniscient);
        let sim = scenario
            .into_builder(test_config(10), &routes, &template, AStarPathfinder::eight())
            .build()
            .unwrap();

        assert_eq!(sim.agents.count, 2);
        assert_eq!(sim.world.resource_count(), 1);
        assert!(sim.world.target_body().is_some());
        assert_eq!(sim.agents.pose[0].heading_deg, 0.0);
        assert!((sim.agents.pose[1].heading_deg + 90.0).abs() < 1e-3);
        assert_eq!(sim.agents.controller[1].route(), &[Vec2::new(5.5, 1.5)]);
    }
}
