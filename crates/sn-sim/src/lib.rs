//! `sn-sim`: tick loop orchestrator for the rust_sentinel guard AI.
//!
//! # Phased tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Sense   : perception for every guard; resources in sight are
//!                remembered; peer sightings collected via the R-tree.
//!   ② Share   : each mutually visible pair prunes, then reconciles intel
//!                (the only cross-guard memory mutation).
//!   ③ Decide  : controllers pick a behaviour and re-plan when due.
//!   ④ Move    : path following; resource pickups resolved.
//!   ⑤ Timers  : suspicion countdown, resource-memory pruning, clock.
//! ```
//!
//! Every phase visits guards in ascending `AgentId` order.  Sounds are
//! delivered synchronously by [`Sim::emit`].
//!
//! # Modules
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | `builder`   | [`SimBuilder`]: validation and listener registration      |
//! | `error`     | [`SimError`], [`ScenarioError`]                           |
//! | `loader`    | ASCII map markers and CSV patrol routes                   |
//! | `observer`  | [`SimObserver`] hooks, [`TickSummary`]                    |
//! | `proximity` | [`AgentIndex`]: R-tree over guard positions               |
//! | `sim`       | [`Sim`] and its phases                                    |
//! | `world`     | [`SceneWorld`]: reference walls / target / resources      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sn_agent::AgentSpec;
//! use sn_core::SimConfig;
//! use sn_sim::{NoopObserver, load_routes_reader, parse_map};
//! use sn_spatial::AStarPathfinder;
//!
//! let scenario = parse_map(MAP, 1.0)?;
//! let routes = load_routes_reader(ROUTES.as_bytes(), scenario.guards.len())?;
//! let mut sim = scenario
//!     .into_builder(config, &routes, &AgentSpec::default(), AStarPathfinder::eight())
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod loader;
pub mod observer;
pub mod proximity;
pub mod sim;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{ScenarioError, ScenarioResult, SimError, SimResult};
pub use loader::{Scenario, load_routes_csv, load_routes_reader, parse_map};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use proximity::AgentIndex;
pub use sim::Sim;
pub use world::{Body, Resource, SceneWorld, TARGET_OBJECT};
