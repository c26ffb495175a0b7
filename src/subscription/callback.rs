// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for session notifications.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::DeviceState;

/// Unique identifier for a subscription.
///
/// Returned when registering a callback and used to unsubscribe later. IDs
/// are unique within a registry's lifetime.
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

/// Callback receiving the full state after a report was merged.
type StateUpdatedCallback = Arc<dyn Fn(&DeviceState) + Send + Sync>;

/// Callback receiving `true` for an accepted command, `false` for a rejected one.
type CommandResultCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Registry for session callbacks.
///
/// Uses `parking_lot::RwLock` for interior mutability so callbacks can be
/// registered from any task while the session dispatches.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use kecontact::state::DeviceState;
/// use kecontact::subscription::CallbackRegistry;
///
/// let registry = CallbackRegistry::new();
/// let calls = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&calls);
/// let id = registry.on_state_updated(move |_state| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// registry.dispatch_state_updated(&DeviceState::new());
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
///
/// assert!(registry.unsubscribe(id));
/// registry.dispatch_state_updated(&DeviceState::new());
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_updated_callbacks: RwLock<HashMap<SubscriptionId, StateUpdatedCallback>>,
    command_result_callbacks: RwLock<HashMap<SubscriptionId, CommandResultCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_updated_callbacks: RwLock::new(HashMap::new()),
            command_result_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for merged reports.
    ///
    /// The callback receives the complete state after the merge. It runs on
    /// the datagram path and must return quickly.
    pub fn on_state_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_updated_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for command acknowledgements and rejections.
    pub fn on_command_result<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.command_result_callbacks
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
        if self.state_updated_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.command_result_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_updated_callbacks.write().clear();
        self.command_result_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Calls every state callback with the given snapshot.
    ///
    /// Callbacks are cloned out of the lock first, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub fn dispatch_state_updated(&self, state: &DeviceState) {
        let callbacks: Vec<_> = self.state_updated_callbacks.read().values().cloned().collect();
        for callback in callbacks {
            callback(state);
        }
    }

    /// Calls every command result callback.
    pub fn dispatch_command_result(&self, accepted: bool) {
        let callbacks: Vec<_> = self
            .command_result_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(accepted);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_updated_callbacks.read().len() + self.command_result_callbacks.read().len()
    }

    /// Returns `true` if no callbacks are registered.
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
            .field("state_updated", &self.state_updated_callbacks.read().len())
            .field("command_result", &self.command_result_callbacks.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    #[test]
    fn subscription_ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_state_updated(|_| {});
        let b = registry.on_command_result(|_| {});
        assert_ne!(a, b);
        assert_eq!(registry.callback_count(), 2);
    }

    #[test]
    fn subscription_id_display() {
        assert_eq!(SubscriptionId::new(7).to_string(), "Sub(7)");
        assert_eq!(SubscriptionId::new(7).value(), 7);
    }

    #[test]
    fn state_updated_receives_snapshot() {
        let registry = CallbackRegistry::new();
        let seen_online = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&seen_online);
        registry.on_state_updated(move |state| {
            flag.store(state.is_online(), Ordering::SeqCst);
        });

        let mut state = DeviceState::new();
        state.set_online(true);
        registry.dispatch_state_updated(&state);

        assert!(seen_online.load(Ordering::SeqCst));
    }

    #[test]
    fn command_result_dispatch() {
        let registry = CallbackRegistry::new();
        let accepted = Arc::new(AtomicUsize::new(0));
        let rejected = Arc::new(AtomicUsize::new(0));

        let (a, r) = (Arc::clone(&accepted), Arc::clone(&rejected));
        registry.on_command_result(move |ok| {
            if ok {
                a.fetch_add(1, Ordering::SeqCst);
            } else {
                r.fetch_add(1, Ordering::SeqCst);
            }
        });

        registry.dispatch_command_result(true);
        registry.dispatch_command_result(false);
        registry.dispatch_command_result(true);

        assert_eq!(accepted.load(Ordering::SeqCst), 2);
        assert_eq!(rejected.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_unknown_id() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(99)));
    }

    #[test]
    fn clear_removes_all() {
        let registry = CallbackRegistry::new();
        registry.on_state_updated(|_| {});
        registry.on_command_result(|_| {});
        registry.clear();
        assert!(registry.is_empty());
    }
}
