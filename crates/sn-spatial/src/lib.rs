//! `sn-spatial`: tile grid and grid pathfinding.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`grid`]       | `TileGrid`, `GridCell`; grid-traversal wall raycasts       |
//! | [`pathfinder`] | `Pathfinder` trait, `Path`, `Connectivity`, `AStarPathfinder` |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod grid;
pub mod pathfinder;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::{GridCell, TileGrid};
pub use pathfinder::{AStarPathfinder, Connectivity, Path, Pathfinder};
