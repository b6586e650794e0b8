//! Walking the planned path.
//!
//! One call per tick.  The guard moves at most `speed · dt` toward the
//! current waypoint, advancing `path_index` whenever it is within
//! `reach_distance`, and turns toward its direction of travel at no more
//! than the configured turn rate.

use sn_core::{Pose, Vec2};
use sn_core::geo::{rotate_towards_deg, wrap_deg};
use sn_memory::AgentMemory;

use crate::AgentConfig;

/// What one movement step did.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct MoveStep {
    /// Distance actually covered.
    pub travelled: f32,
    /// Waypoints passed this step.
    pub waypoints_reached: usize,
}

/// Step `pose` along `memory.path`.  A missing or completed path leaves
/// the pose untouched.
pub fn follow_path(
    pose:   &mut Pose,
    memory: &mut AgentMemory,
    config: &AgentConfig,
    speed:  f32,
    dt:     f32,
) -> MoveStep {
    let mut step = MoveStep::default();
    let mut budget = (speed * dt).max(0.0);
    let mut heading_to = None;

    while let Some(waypoint) = memory.current_waypoint() {
        let offset = waypoint - pose.position;
        let distance = offset.length();
        if distance <= config.reach_distance {
            memory.advance_path();
            step.waypoints_reached += 1;
            continue;
        }
        if budget <= 0.0 {
            break;
        }
        heading_to = Some(offset);
        let stride = budget.min(distance);
        pose.position = move_towards(pose.position, waypoint, stride);
        budget -= stride;
        step.travelled += stride;
        if distance - stride <= config.reach_distance {
            memory.advance_path();
            step.waypoints_reached += 1;
        }
    }

    if let Some(dir) = heading_to {
        let turned = rotate_towards_deg(pose.heading_deg, dir.angle_deg(), config.turn_rate_deg * dt);
        pose.heading_deg = wrap_deg(turned);
    }
    step
}

fn move_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_step || distance <= f32::EPSILON {
        to
    } else {
        from + offset * (max_step / distance)
    }
}
