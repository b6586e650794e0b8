//! Listener registry with scoped membership.
//!
//! The registry is owned by the simulation root and handed to the
//! propagator by cloning the handle.  Agents join by calling
//! [`ListenerRegistry::register`] and stay registered for exactly as long as
//! they hold the returned [`Registration`]; dropping it (including during
//! unwinding) removes them.
//!
//! Single-threaded: the shared list is an `Rc<RefCell<..>>` and is only
//! borrowed for the duration of one method call.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use sn_core::AgentId;
use tracing::trace;

/// Shared, ordered set of listening agents.
#[derive(Clone, Debug, Default)]
pub struct ListenerRegistry {
    listeners: Rc<RefCell<Vec<AgentId>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` at the end of the registration order.
    ///
    /// Registering an already present id is a no-op: the returned guard does
    /// not own the membership and dropping it leaves the first registration in place.
    #[must_use = "dropping the Registration immediately unregisters the listener"]
    pub fn register(&self, id: AgentId) -> Registration {
        let mut list = self.listeners.borrow_mut();
        let owns = if list.contains(&id) {
            false
        } else {
            list.push(id);
            trace!(%id, "listener registered");
            true
        };
        Registration { registry: Rc::downgrade(&self.listeners), id, owns }
    }

    /// Snapshot of the current listeners, in registration order.
    pub fn listeners(&self) -> Vec<AgentId> {
        self.listeners.borrow().clone()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.listeners.borrow().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

/// Membership guard returned by [`ListenerRegistry::register`].
#[derive(Debug)]
pub struct Registration {
    registry: Weak<RefCell<Vec<AgentId>>>,
    id: AgentId,
    owns: bool,
}

impl Registration {
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// `false` for the guard returned by a duplicate registration.
    pub fn is_owner(&self) -> bool {
        self.owns
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if !self.owns {
            return;
        }
        // The registry may already be gone during teardown.
        if let Some(list) = self.registry.upgrade() {
            if let Ok(mut list) = list.try_borrow_mut() {
                list.retain(|&l| l != self.id);
                trace!(id = %self.id, "listener unregistered");
            }
        }
    }
}
