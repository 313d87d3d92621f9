// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener fan-out for engine events
//!
//! Subscribers register name patterns and receive matching events on an
//! unbounded channel. `publish` snapshots the matching senders before
//! delivering, so the subscriber map is never borrowed while sending and
//! listeners may subscribe or unsubscribe from any task.

use crate::event::Event;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<Event>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Pattern over event names
///
/// Supports:
///   - Exact: "resource:changed"
///   - Category: "pin:*" matches every "pin:..." event
///   - Everything: "*"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn matches(&self, event_name: &str) -> bool {
        if self.0 == "*" {
            return true;
        }
        match self.0.strip_suffix(":*") {
            Some(category) => event_name
                .split_once(':')
                .is_some_and(|(prefix, _)| prefix == category),
            None => self.0 == event_name,
        }
    }
}

/// Handle for unsubscribing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

struct Subscriber {
    patterns: Vec<EventPattern>,
    tx: EventSender,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    subscribers: HashMap<SubscriberId, Subscriber>,
}

/// Routes published events to matching subscribers
#[derive(Clone, Default)]
pub struct EventBus {
    state: Arc<RwLock<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching any of `patterns`
    pub fn subscribe(&self, patterns: Vec<EventPattern>) -> (SubscriberId, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.next_id += 1;
        let id = SubscriberId(state.next_id);
        state.subscribers.insert(id, Subscriber { patterns, tx });
        (id, rx)
    }

    /// Subscribe to every event
    pub fn subscribe_all(&self) -> (SubscriberId, EventReceiver) {
        self.subscribe(vec![EventPattern::new("*")])
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.subscribers.remove(&id);
    }

    /// Deliver `event` to every matching subscriber.
    ///
    /// Subscribers whose receiver was dropped are pruned.
    pub fn publish(&self, event: Event) {
        let name = event.name();
        let targets: Vec<(SubscriberId, EventSender)> = {
            let state = self.state.read().unwrap_or_else(|e| e.into_inner());
            state
                .subscribers
                .iter()
                .filter(|(_, sub)| sub.patterns.iter().any(|p| p.matches(name)))
                .map(|(id, sub)| (*id, sub.tx.clone()))
                .collect()
        };

        tracing::trace!(event = name, subscribers = targets.len(), "publishing");

        let closed: Vec<SubscriberId> = targets
            .into_iter()
            .filter(|(_, tx)| tx.send(event.clone()).is_err())
            .map(|(id, _)| id)
            .collect();

        if !closed.is_empty() {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            for id in closed {
                state.subscribers.remove(&id);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .subscribers
            .len()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
