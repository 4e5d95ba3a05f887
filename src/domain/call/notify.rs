//! Change notification hub
//!
//! Delivers committed change events to registered listeners synchronously,
//! in registration order, exactly once per event. A failing listener never
//! blocks delivery to the rest; failures are collected and surfaced to the
//! caller of `emit` after the full sweep.

use crate::domain::call::event::ChangeEvent;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Error raised by a listener while handling a change event
#[derive(Error, Debug, Clone)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Consumer of change events
///
/// Delivery runs on the context that committed the mutation. Listeners doing
/// long-running work must hand off to their own task instead of blocking here.
pub trait SessionListener: Send + Sync {
    fn on_change(&self, event: &ChangeEvent) -> std::result::Result<(), ListenerError>;
}

/// Tracks listeners for one session and fans out change events
pub struct NotificationHub {
    listeners: Mutex<Vec<Arc<dyn SessionListener>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Register a listener. Subscribing the same listener twice is a no-op.
    pub fn subscribe(&self, listener: Arc<dyn SessionListener>) {
        let mut listeners = self.listeners.lock().unwrap();
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return;
        }
        listeners.push(listener);
    }

    /// Remove a listener. Unsubscribing an unregistered listener is a no-op.
    pub fn unsubscribe(&self, listener: &Arc<dyn SessionListener>) {
        let mut listeners = self.listeners.lock().unwrap();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// Deliver an event to every listener registered at the moment of emission.
    ///
    /// The list is snapshotted before delivery: a listener subscribed while
    /// the event is in flight receives only subsequent events. Every listener
    /// is attempted; collected failures are returned after the sweep.
    pub fn emit(&self, event: &ChangeEvent) -> Result<()> {
        let current: Vec<Arc<dyn SessionListener>> = {
            let listeners = self.listeners.lock().unwrap();
            listeners.clone()
        };

        debug!(
            handler_id = %event.handler_id(),
            listeners = current.len(),
            "emitting change event"
        );

        let mut failures: Vec<String> = Vec::new();
        for listener in &current {
            if let Err(e) = listener.on_change(event) {
                failures.push(e.to_string());
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DomainError::ListenerFailure(failures.join("; ")))
        }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
