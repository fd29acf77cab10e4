// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish presence updates.

use crate::subscription::SubscriptionId;
use crate::tracker::{PresenceChange, PresenceReport};

/// Trait for types that support presence subscriptions.
///
/// # Examples
///
/// ```no_run
/// use iptime_tracker::{Scanner, TrackerConfig};
/// use iptime_tracker::subscription::Subscribable;
///
/// # fn example(config: TrackerConfig) -> iptime_tracker::Result<()> {
/// let scanner = Scanner::new(config)?;
///
/// let sub_id = scanner.on_state_changed(|report, change| {
///     println!("{} is now {} (was {})", report.host_name, change.to, change.from);
/// });
///
/// scanner.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to every presence report, one per target per tick.
    fn on_presence<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport) + Send + Sync + 'static;

    /// Subscribes to presence state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport, PresenceChange) + Send + Sync + 'static;

    /// Subscribes to router availability changes.
    ///
    /// The callback receives `false` when polls keep failing and `true`
    /// once they succeed again.
    fn on_availability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
