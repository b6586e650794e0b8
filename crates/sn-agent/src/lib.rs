//! `sn-agent`: guard behaviour and storage for the `rust_sentinel` guard AI.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`config`]      | `AgentConfig`, `Health`                                     |
//! | [`state`]       | `AgentState`, `ControllerOutput`                            |
//! | [`hearing`]     | `HearingReaction` (importance weighting of sounds)          |
//! | [`movement`]    | `follow_path`, `MoveStep`                                   |
//! | [`controller`]  | `AgentController`, `DecideInput`                            |
//! | [`store`]       | `AgentStore` (SoA arrays), `AgentRngs`, `AgentView`         |
//! | [`builder`]     | `AgentStoreBuilder`, `AgentSpec`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on config and state.     |

pub mod builder;
pub mod config;
pub mod controller;
pub mod hearing;
pub mod movement;
pub mod state;
pub mod store;


pub use builder::{AGENT_BODY_BASE, AgentSpec, AgentStoreBuilder};
pub use config::{AgentConfig, Health};
pub use controller::{AgentController, DecideInput};
pub use hearing::{HearingReaction, MUFFLED_SPEED_FACTOR};
pub use movement::{MoveStep, follow_path};
pub use state::{AgentState, ControllerOutput};
pub use store::{AgentRngs, AgentStore, AgentView};
