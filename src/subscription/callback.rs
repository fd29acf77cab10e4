// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for presence subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::tracker::{PresenceChange, PresenceReport};

/// Unique identifier for a subscription.
///
/// Returned when registering a callback; pass it to `unsubscribe` to
/// remove the callback again. IDs are unique within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PresenceCallback = Arc<dyn Fn(&PresenceReport) + Send + Sync>;

type StateChangedCallback = Arc<dyn Fn(&PresenceReport, PresenceChange) + Send + Sync>;

type AvailabilityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Registry for presence callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability, so callbacks can be
/// registered from any task while the scanner dispatches. Callbacks run
/// synchronously on the polling task and must not block.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    /// Called with every report, changed or not.
    presence_callbacks: RwLock<HashMap<SubscriptionId, PresenceCallback>>,
    /// Called when a target's state changed.
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    /// Called when the router becomes available or unavailable.
    availability_callbacks: RwLock<HashMap<SubscriptionId, AvailabilityCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            presence_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            availability_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for every presence report.
    pub fn on_presence<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.presence_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for presence state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport, PresenceChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for router availability changes.
    pub fn on_availability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.availability_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.presence_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
            || self.availability_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.presence_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
        self.availability_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a report, and its change if there was one.
    pub fn dispatch(&self, report: &PresenceReport, change: Option<PresenceChange>) {
        for callback in self.presence_callbacks.read().values() {
            callback(report);
        }

        if let Some(change) = change {
            for callback in self.state_changed_callbacks.read().values() {
                callback(report, change);
            }
        }
    }

    /// Dispatches a router availability change.
    pub fn dispatch_availability(&self, available: bool) {
        for callback in self.availability_callbacks.read().values() {
            callback(available);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.presence_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
            + self.availability_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    use crate::tracker::{Thresholds, TrackedTarget};
    use crate::types::PresenceState;

    fn report() -> PresenceReport {
        let target = TrackedTarget::new("phone", "00-11-22-33-44-55".parse().unwrap(), Thresholds::default());
        PresenceReport::new("http://192.168.0.1", &target)
    }

    fn change() -> PresenceChange {
        PresenceChange {
            from: PresenceState::Unavailable,
            to: PresenceState::Home,
        }
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(42).to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
    }

    #[test]
    fn presence_callback_sees_every_report() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_presence(move |_report| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&report(), None);
        registry.dispatch(&report(), Some(change()));
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        assert!(registry.unsubscribe(id));
        registry.dispatch(&report(), None);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn state_changed_callback_only_on_change() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<PresenceChange>));
        let received_clone = received.clone();

        registry.on_state_changed(move |_report, change| {
            *received_clone.write() = Some(change);
        });

        registry.dispatch(&report(), None);
        assert!(received.read().is_none());

        registry.dispatch(&report(), Some(change()));
        assert_eq!(*received.read(), Some(change()));
    }

    #[test]
    fn availability_callback() {
        let registry = CallbackRegistry::new();
        let last = Arc::new(RwLock::new(None::<bool>));
        let last_clone = last.clone();

        registry.on_availability_changed(move |available| {
            *last_clone.write() = Some(available);
        });

        registry.dispatch_availability(false);
        assert_eq!(*last.read(), Some(false));
    }

    #[test]
    fn unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn clear_and_unique_ids() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_presence(|_| {});
        let id2 = registry.on_state_changed(|_, _| {});
        let id3 = registry.on_availability_changed(|_| {});
        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_presence(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("callback_count: 1"));
    }
}
