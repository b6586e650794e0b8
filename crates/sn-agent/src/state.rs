//! Behaviour state reported by the controller each tick.

use std::fmt;

use sn_core::{ObjectId, Vec2};

/// What a guard is doing this tick.  Recomputed from scratch every tick.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// Walking the patrol route toward route index `waypoint`.
    Patrolling { waypoint: usize },
    /// Walking toward a sound source.
    Investigating { sound: Vec2 },
    /// Chasing the target.  `direct` while it is in sight, otherwise heading
    /// for its last known position.
    Pursuing { target: Vec2, direct: bool },
    SeekingResource { resource: ObjectId },
    /// No route and nothing else to do.
    #[default]
    Idle,
}

impl AgentState {
    pub fn is_pursuing(&self) -> bool {
        matches!(self, AgentState::Pursuing { .. })
    }

    /// Short name for logs and observers.
    pub fn label(&self) -> &'static str {
        match self {
            AgentState::Patrolling { .. } => "patrolling",
            AgentState::Investigating { .. } => "investigating",
            AgentState::Pursuing { direct: true, .. } => "pursuing",
            AgentState::Pursuing { direct: false, .. } => "searching",
            AgentState::SeekingResource { .. } => "seeking-resource",
            AgentState::Idle => "idle",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one controller decision.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ControllerOutput {
    pub state: AgentState,
    /// Next point on the current path, if any.
    pub desired_waypoint: Option<Vec2>,
}
