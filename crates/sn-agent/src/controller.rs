//! Per-guard behaviour selection and throttled planning.
//!
//! # Priority (highest first)
//!
//! ```text
//! target visible, or sighting younger than lost_target_timeout  → Pursuing
//! health below seek fraction and a live resource remembered      → SeekingResource
//! a sound worth investigating                                    → Investigating
//! patrol route non-empty                                         → Patrolling
//! otherwise                                                      → Idle
//! ```
//!
//! Perception has already written `target_visible` into memory by the time
//! [`AgentController::decide`] runs; movement happens afterwards in
//! [`AgentController::advance`].

use sn_acoustic::SoundEvent;
use sn_core::{ObjectId, Pose, ResourceView, SimTime, Vec2};
use sn_memory::AgentMemory;
use sn_spatial::{Pathfinder, TileGrid};
use tracing::debug;

use crate::movement::{MoveStep, follow_path};
use crate::{AgentConfig, AgentState, ControllerOutput, Health, HearingReaction};

/// Per-tick inputs that do not live in memory.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecideInput {
    pub now: SimTime,
    /// Seconds since the previous decision.
    pub dt: f32,
    pub pose: Pose,
    pub health: Health,
    /// True target position, consulted only when memory says it is visible.
    pub target: Option<Vec2>,
}

/// What the current path was planned toward.  A change forces a re-plan.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Goal {
    Pursue,
    Seek(ObjectId),
    Investigate(Vec2),
    Patrol(usize),
}

/// Behaviour chosen this tick, with the point to plan toward.
#[derive(Copy, Clone, Debug)]
struct Choice {
    state: AgentState,
    goal: Option<Goal>,
    point: Option<Vec2>,
}

impl Choice {
    fn idle() -> Self {
        Self { state: AgentState::Idle, goal: None, point: None }
    }
}

/// Decision-making for one guard.
#[derive(Clone, Debug)]
pub struct AgentController {
    config: AgentConfig,
    hearing: HearingReaction,
    route: Vec<Vec2>,
    repath_timer: f32,
    goal: Option<Goal>,
    plan_failed: bool,
    state: AgentState,
    suspicious: bool,
    confidence: f32,
}

impl Default for AgentController {
    fn default() -> Self {
        Self::new(AgentConfig::default(), Vec::new())
    }
}

impl AgentController {
    /// `route` is the ordered patrol loop; empty means the guard idles.
    pub fn new(config: AgentConfig, route: Vec<Vec2>) -> Self {
        Self {
            config,
            hearing: HearingReaction::from_config(&config),
            route,
            repath_timer: 0.0,
            goal: None,
            plan_failed: false,
            state: AgentState::Idle,
            suspicious: false,
            confidence: 0.0,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn route(&self) -> &[Vec2] {
        &self.route
    }

    pub fn set_route(&mut self, route: Vec<Vec2>) {
        self.route = route;
        self.goal = None;
    }

    pub fn set_can_hear(&mut self, can_hear: bool) {
        self.config.can_hear = can_hear;
        self.hearing.can_hear = can_hear;
    }

    /// State chosen by the most recent [`decide`](Self::decide).
    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_chasing(&self) -> bool {
        self.state.is_pursuing()
    }

    /// Alarmed but not chasing: investigating a sound, or holding a
    /// sub-threshold sighting.
    pub fn is_suspicious(&self) -> bool {
        self.suspicious
    }

    pub fn visible_confidence(&self) -> f32 {
        self.confidence
    }

    // ── Hearing ───────────────────────────────────────────────────────────

    /// Feed a delivered sound through the hearing reaction.
    pub fn on_hear(&self, event: &SoundEvent, volume: f32, memory: &mut AgentMemory) -> bool {
        self.hearing.react(event, volume, memory)
    }

    // ── Decide ────────────────────────────────────────────────────────────

    /// Pick this tick's behaviour and re-plan if needed.
    pub fn decide<P, R>(
        &mut self,
        input:      &DecideInput,
        memory:     &mut AgentMemory,
        grid:       &TileGrid,
        pathfinder: &P,
        resources:  &R,
    ) -> ControllerOutput
    where
        P: Pathfinder + ?Sized,
        R: ResourceView + ?Sized,
    {
        let now = input.now;
        let position = input.pose.position;
        self.repath_timer += input.dt;
        let intel = std::mem::take(&mut memory.intel_received);

        if memory.target_visible {
            if let Some(p) = input.target {
                memory.record_sighting(p, now);
            }
        }
        self.settle_previous(position, intel, memory, resources);

        let choice = self.choose(input, memory, resources);

        if let (Some(goal), Some(point)) = (choice.goal, choice.point) {
            let changed = self.goal != Some(goal);
            let due = self.repath_timer >= self.config.repath_interval;
            let patrol_stale =
                matches!(goal, Goal::Patrol(_)) && memory.path_exhausted() && !self.plan_failed;
            if changed || due || patrol_stale || (intel && goal == Goal::Pursue) {
                self.plan(position, point, grid, pathfinder, memory);
            }
        } else if self.goal.is_some() {
            memory.clear_path();
        }
        self.goal = choice.goal;

        if matches!(choice.state, AgentState::Investigating { .. }) {
            memory.suspicion.raise(self.config.suspicion_duration);
        }

        if choice.state.label() != self.state.label() {
            debug!(from = %self.state, to = %choice.state, "state change");
        }
        self.state = choice.state;
        self.suspicious = !self.state.is_pursuing() && memory.suspicion.is_active();
        self.confidence = memory.visible_confidence;

        ControllerOutput { state: self.state, desired_waypoint: memory.current_waypoint() }
    }

    /// Walk the current path for `dt` seconds.
    pub fn advance(&self, pose: &mut Pose, memory: &mut AgentMemory, dt: f32) -> MoveStep {
        follow_path(pose, memory, &self.config, self.speed(memory), dt)
    }

    /// Move speed for the current state.
    pub fn speed(&self, memory: &AgentMemory) -> f32 {
        match (self.state, memory.heard) {
            (AgentState::Investigating { .. }, Some(h)) => self.config.move_speed * h.speed_factor,
            _ => self.config.move_speed,
        }
    }

    /// Close out whatever last tick's goal was once its path has run out.
    /// A sighting absorbed this tick keeps a finished pursuit alive.
    fn settle_previous<R>(&mut self, position: Vec2, intel: bool, memory: &mut AgentMemory, resources: &R)
    where
        R: ResourceView + ?Sized,
    {
        match self.goal {
            Some(Goal::Pursue) => {
                if !intel && !memory.target_visible && memory.path_completed() {
                    debug!("reached last known position, target not in sight");
                    memory.last_known_target = None;
                    memory.clear_path();
                }
            }
            Some(Goal::Investigate(p)) => {
                let same = memory.heard.is_some_and(|h| h.position == p);
                if same && memory.path_exhausted() {
                    memory.heard = None;
                    memory.clear_path();
                }
            }
            Some(Goal::Patrol(i)) => {
                if !self.route.is_empty() && memory.path_completed() {
                    memory.waypoint_index = (i + 1) % self.route.len();
                }
            }
            Some(Goal::Seek(_)) | None => {}
        }

        if let Some(id) = memory.target_resource {
            match resources.resource_position(id) {
                None => {
                    debug!(resource = %id, "resource gone, abandoning");
                    memory.forget_resource(id);
                }
                Some(p) if position.distance(p) <= self.config.reach_distance * 2.0 => {
                    debug!(resource = %id, "resource reached");
                    memory.forget_resource(id);
                }
                Some(_) => {}
            }
        }
    }

    fn choose<R>(&self, input: &DecideInput, memory: &mut AgentMemory, resources: &R) -> Choice
    where
        R: ResourceView + ?Sized,
    {
        let now = input.now;

        // Pursuit.
        if let Some(sighting) = memory.last_known_target {
            if memory.target_visible || now.since(sighting.time) < self.config.lost_target_timeout {
                return Choice {
                    state: AgentState::Pursuing { target: sighting.position, direct: memory.target_visible },
                    goal: Some(Goal::Pursue),
                    point: Some(sighting.position),
                };
            }
        }

        // Resource.
        if input.health.current < input.health.max * self.config.seek_health_fraction {
            let current = memory
                .target_resource
                .and_then(|id| resources.resource_position(id).map(|p| (id, p)));
            let pick = current.or_else(|| {
                memory
                    .closest_resource(input.pose.position, |id| resources.resource_exists(id))
                    .and_then(|(id, _)| resources.resource_position(id).map(|p| (id, p)))
            });
            if let Some((id, p)) = pick {
                memory.target_resource = Some(id);
                return Choice {
                    state: AgentState::SeekingResource { resource: id },
                    goal: Some(Goal::Seek(id)),
                    point: Some(p),
                };
            }
        }
        memory.target_resource = None;

        // Sound.
        if let Some(heard) = memory.heard {
            return Choice {
                state: AgentState::Investigating { sound: heard.position },
                goal: Some(Goal::Investigate(heard.position)),
                point: Some(heard.position),
            };
        }

        // Patrol.
        if self.route.is_empty() {
            return Choice::idle();
        }
        let index = memory.waypoint_index % self.route.len();
        memory.waypoint_index = index;
        Choice {
            state: AgentState::Patrolling { waypoint: index },
            goal: Some(Goal::Patrol(index)),
            point: Some(self.route[index]),
        }
    }

    fn plan<P>(&mut self, from: Vec2, to: Vec2, grid: &TileGrid, pathfinder: &P, memory: &mut AgentMemory)
    where
        P: Pathfinder + ?Sized,
    {
        self.repath_timer = 0.0;
        match pathfinder.find_path(grid, from, to) {
            Some(path) => {
                memory.set_path(Some(path));
                self.plan_failed = false;
            }
            None => {
                debug!(%from, %to, "no path");
                memory.clear_path();
                self.plan_failed = true;
            }
        }
    }
}
