//! Simulation observer trait for progress reporting and data collection.

use sn_agent::ControllerOutput;
use sn_core::{AgentId, Tick};
use sn_memory::ExchangeReport;

/// Counts gathered over one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct TickSummary {
    /// Guards in pursuit after the decide phase.
    pub pursuing: usize,
    /// Intel exchanges that changed at least one memory.
    pub exchanges: usize,
    /// Resources picked up during movement.
    pub pickups: usize,
}

/// Callbacks invoked by [`Sim::step`][crate::Sim::step] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: state logger
///
/// ```rust,ignore
/// struct Chases(usize);
///
/// impl SimObserver for Chases {
///     fn on_agent_state(&mut self, _tick: Tick, _agent: AgentId, out: &ControllerOutput) {
///         if out.state.is_pursuing() {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per guard after its decision, in ascending id order.
    fn on_agent_state(&mut self, _tick: Tick, _agent: AgentId, _output: &ControllerOutput) {}

    /// Called when an exchange between `a` and `b` changed either memory.
    fn on_intel_shared(&mut self, _tick: Tick, _a: AgentId, _b: AgentId, _report: &ExchangeReport) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
