//! Resolver events and their best-effort delivery

use std::fmt;

use serde::Serialize;

/// Notifications published by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PatchEvent {
    /// A dynamic overlay was discarded because the base selection changed
    DynamicPatchReset {
        /// Configuration selected by the change that discarded the overlay
        configuration: String,
    },
}

type Listener = Box<dyn FnMut(&PatchEvent)>;

/// Synchronous fan-out to subscribed listeners. Publishing with no
/// subscribers is not an error.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PatchEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver `event` to every listener in subscription order, returning how
    /// many were notified
    pub fn publish(&mut self, event: &PatchEvent) -> usize {
        for listener in &mut self.listeners {
            listener(event);
        }
        self.listeners.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
