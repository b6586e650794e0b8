//! `sn-acoustic`: sound events and their propagation to listening agents.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`event`]      | `SoundEvent`, `SoundKind`                                 |
//! | [`registry`]   | `ListenerRegistry`, `Registration` (scoped membership)    |
//! | [`propagator`] | `AcousticPropagator`, `PropagatorConfig`, `HearingReceiver` |
//!
//! # Flow
//!
//! ```text
//! Sim::emit(event)
//!   └─ AcousticPropagator::emit
//!        for listener in registry (registration order):
//!          range check → wall raycast → effective range → falloff
//!          └─ HearingReceiver::on_hear(listener, event, volume)
//! ```
//!
//! The propagator never filters on a listener's behalf beyond range and
//! occlusion; attention thresholds live with the receiver.

pub mod event;
pub mod propagator;
pub mod registry;

#[cfg(test)]
mod tests;

pub use event::{SoundEvent, SoundKind};
pub use propagator::{AcousticPropagator, HearingReceiver, PropagatorConfig};
pub use registry::{ListenerRegistry, Registration};
