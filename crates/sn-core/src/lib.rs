//! `sn-core`: foundational types for the `rust_sentinel` guard AI.
//!
//! This crate is a dependency of every other `sn-*` crate.  It intentionally
//! has no `sn-*` dependencies and minimal external ones (`rand`, `thiserror`,
//! `bitflags`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ObjectId`                                 |
//! | [`geo`]         | `Vec2`, `Pose`, angle helpers                         |
//! | [`time`]        | `Tick`, `SimTime`, `SimClock`, `SimConfig`            |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`occlusion`]   | `LayerMask`, `Hit`, the `Occlusion` capability trait  |
//! | [`view`]        | `ResourceView`, `TargetView` world capabilities       |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod occlusion;
pub mod rng;
pub mod time;
pub mod view;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Pose, Vec2};
pub use ids::{AgentId, ObjectId};
pub use occlusion::{Hit, LayerMask, Occlusion};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, SimTime, Tick};
pub use view::{ResourceView, TargetView};
