use sn_core::{AgentId, Vec2};
use sn_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("{agent} spawns at {position}, outside the walkable grid")]
    AgentOutsideGrid { agent: AgentId, position: Vec2 },

    #[error("{agent} patrol waypoint {index} at {position} is outside the walkable grid")]
    WaypointOutsideGrid {
        agent:    AgentId,
        index:    usize,
        position: Vec2,
    },
}

pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error("map error: {0}")]
    Map(#[from] SpatialError),

    #[error("route row for agent {agent_id}, but the map has only {guards} guards")]
    UnknownAgent { agent_id: u32, guards: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
