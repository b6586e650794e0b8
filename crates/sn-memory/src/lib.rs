//! `sn-memory`: what a guard believes, and how two guards agree on it.
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`memory`] | `AgentMemory`, `MemoryKey`, `Sighting`, `Suspicion`, `HeardSound`, `ResourceSighting` |
//! | [`intel`]  | `IntelSnapshot`, `IntelExchange`, `ExchangeReport`           |
//!
//! Every belief is a typed field.  An absent belief reads as its default
//! (`None`, `false`, `0`), never as an error.

pub mod intel;
pub mod memory;


pub use intel::{Absorbed, ExchangeReport, IntelExchange, IntelSnapshot};
pub use memory::{AgentMemory, HeardSound, MemoryKey, ResourceSighting, Sighting, Suspicion};
