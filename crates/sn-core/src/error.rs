//! Framework error type.
//!
//! Sub-crates define their own error enums and may wrap `CoreError` as one
//! variant.  Nothing in the per-tick path returns these; they surface only
//! from construction and loading.

use thiserror::Error;

use crate::{AgentId, ObjectId};

/// The top-level error type for `sn-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `sn-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
