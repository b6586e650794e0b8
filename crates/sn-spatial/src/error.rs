//! Spatial-subsystem error type.
//!
//! Only grid *construction* can fail.  An unreachable goal is an expected
//! outcome and is reported as `None` by [`Pathfinder::find_path`].
//!
//! [`Pathfinder::find_path`]: crate::Pathfinder::find_path

use thiserror::Error;

/// Errors produced by `sn-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("grid must have at least one cell (got {width}x{height})")]
    EmptyGrid { width: u32, height: u32 },

    #[error("cell size must be positive and finite (got {0})")]
    InvalidCellSize(f32),

    #[error("unexpected map character {ch:?} at line {line}, column {column}")]
    MalformedMap { line: usize, column: usize, ch: char },

    #[error("map line {line} has {found} columns, expected {expected}")]
    RaggedMap { line: usize, expected: usize, found: usize },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
