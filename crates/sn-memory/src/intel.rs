//! Intel sharing between mutually visible agents.
//!
//! # Merge rule
//!
//! Each side offers an [`IntelSnapshot`] and absorbs the other's:
//!
//! - target sighting: replaced only by a *strictly* newer one;
//! - resources: merged per key, a strictly newer discovery wins.
//!
//! Both rules take a per-field maximum by timestamp, so the exchange is
//! symmetric, idempotent and independent of which agent goes first.
//! Owners prune stale resources before snapshotting.

use std::collections::BTreeMap;

use sn_core::ObjectId;

use crate::{AgentMemory, ResourceSighting, Sighting};

/// The part of an agent's memory it is willing to share.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntelSnapshot {
    pub target: Option<Sighting>,
    pub resources: BTreeMap<ObjectId, ResourceSighting>,
}

/// What one side learned from a snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Absorbed {
    /// A fresher target sighting replaced the old one.
    pub target: bool,
    /// Resource entries added or refreshed.
    pub resources: usize,
}

impl Absorbed {
    pub fn is_empty(&self) -> bool {
        !self.target && self.resources == 0
    }
}

/// Outcome of one [`IntelExchange::reconcile`] call, for logging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ExchangeReport {
    pub a_learned: Absorbed,
    pub b_learned: Absorbed,
}

impl ExchangeReport {
    /// `true` if neither side changed.
    pub fn is_empty(&self) -> bool {
        self.a_learned.is_empty() && self.b_learned.is_empty()
    }
}

impl AgentMemory {
    pub fn snapshot(&self) -> IntelSnapshot {
        IntelSnapshot {
            target: self.last_known_target,
            resources: self.known_resources.clone(),
        }
    }

    /// Merge a peer's snapshot into this memory.
    pub fn absorb(&mut self, intel: &IntelSnapshot) -> Absorbed {
        let mut learned = Absorbed::default();

        if let Some(theirs) = intel.target {
            let fresher = self.last_known_target.is_none_or(|ours| theirs.time > ours.time);
            if fresher {
                self.last_known_target = Some(theirs);
                self.intel_received = true;
                learned.target = true;
            }
        }

        for (&id, &theirs) in &intel.resources {
            let fresher = self
                .known_resources
                .get(&id)
                .is_none_or(|ours| theirs.discovered > ours.discovered);
            if fresher {
                self.known_resources.insert(id, theirs);
                learned.resources += 1;
            }
        }
        learned
    }
}

/// The reconciliation protocol.
pub struct IntelExchange;

impl IntelExchange {
    /// Bring `a` and `b` to the merged state.  Both snapshots are taken
    /// before either side absorbs, so argument order does not matter.
    pub fn reconcile(a: &mut AgentMemory, b: &mut AgentMemory) -> ExchangeReport {
        let from_a = a.snapshot();
        let from_b = b.snapshot();
        ExchangeReport {
            a_learned: a.absorb(&from_b),
            b_learned: b.absorb(&from_a),
        }
    }
}
