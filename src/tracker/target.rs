// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debounced presence state for one tracked device.

use chrono::{DateTime, Utc};

use crate::session::PollOutcome;
use crate::station::StationRecord;
use crate::types::{MacAddress, PresenceState};

/// How many inconclusive polls are tolerated before the state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Failed polls tolerated before the state becomes `N/A`.
    pub error: u32,
    /// Missed polls tolerated before the state becomes `not_home`.
    pub not_home: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            error: 3,
            not_home: 1,
        }
    }
}

/// What the latest poll said about the target.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Sighting {
    /// No station list was obtained.
    #[default]
    NoData,
    /// A station list was obtained without the target in it.
    Missing,
    /// The target was in the station list.
    Seen(StationRecord),
}

/// A state transition produced by [`TrackedTarget::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceChange {
    /// State before the poll.
    pub from: PresenceState,
    /// State after the poll.
    pub to: PresenceState,
}

/// One configured device whose presence is tracked.
///
/// The state starts as [`PresenceState::Unavailable`] and only changes
/// once the counters cross their thresholds, so a single missed or failed
/// poll never flips it.
///
/// # Examples
///
/// ```
/// use iptime_tracker::session::PollOutcome;
/// use iptime_tracker::station::StationList;
/// use iptime_tracker::tracker::{Thresholds, TrackedTarget};
/// use iptime_tracker::types::PresenceState;
///
/// let mut target = TrackedTarget::new("phone", "AA:BB:CC:00:11:22".parse().unwrap(), Thresholds::default());
/// let empty = PollOutcome::Stations(StationList::new());
///
/// target.apply(&empty);
/// assert_eq!(target.state(), PresenceState::Unavailable);
/// target.apply(&empty);
/// assert_eq!(target.state(), PresenceState::NotHome);
/// ```
#[derive(Debug, Clone)]
pub struct TrackedTarget {
    name: String,
    mac: MacAddress,
    thresholds: Thresholds,
    state: PresenceState,
    error_count: u32,
    not_home_count: u32,
    sighting: Sighting,
    last_seen: Option<DateTime<Utc>>,
}

impl TrackedTarget {
    /// Creates a target in the `N/A` state.
    #[must_use]
    pub fn new(name: impl Into<String>, mac: MacAddress, thresholds: Thresholds) -> Self {
        Self {
            name: name.into(),
            mac,
            thresholds,
            state: PresenceState::Unavailable,
            error_count: 0,
            not_home_count: 0,
            sighting: Sighting::NoData,
            last_seen: None,
        }
    }

    /// Returns the configured name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target's MAC address.
    #[must_use]
    pub fn mac(&self) -> MacAddress {
        self.mac
    }

    /// Returns the current presence state.
    #[must_use]
    pub fn state(&self) -> PresenceState {
        self.state
    }

    /// Returns the consecutive failed poll count.
    #[must_use]
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Returns the consecutive missed poll count.
    #[must_use]
    pub fn not_home_count(&self) -> u32 {
        self.not_home_count
    }

    /// Returns what the latest poll said about the target.
    #[must_use]
    pub fn sighting(&self) -> &Sighting {
        &self.sighting
    }

    /// Returns when the target was last in a station list.
    #[must_use]
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    /// Feeds one poll outcome into the counters.
    ///
    /// Returns the transition if the state changed.
    pub fn apply(&mut self, outcome: &PollOutcome) -> Option<PresenceChange> {
        let from = self.state;

        match outcome {
            PollOutcome::Stations(list) => {
                self.error_count = 0;
                if let Some(record) = list.get(&self.mac) {
                    self.not_home_count = 0;
                    self.state = PresenceState::Home;
                    self.sighting = Sighting::Seen(record.clone());
                    self.last_seen = Some(Utc::now());
                } else {
                    self.sighting = Sighting::Missing;
                    if self.not_home_count < self.thresholds.not_home {
                        self.not_home_count += 1;
                    } else {
                        self.state = PresenceState::NotHome;
                    }
                }
            }
            PollOutcome::SessionExpired => {
                self.sighting = Sighting::Missing;
            }
            PollOutcome::Failed(_) => {
                self.sighting = Sighting::NoData;
                if self.error_count < self.thresholds.error {
                    self.error_count += 1;
                } else {
                    self.state = PresenceState::Unavailable;
                }
            }
        }

        (from != self.state).then(|| {
            tracing::debug!(name = %self.name, mac = %self.mac, %from, to = %self.state, "presence changed");
            PresenceChange {
                from,
                to: self.state,
            }
        })
    }
}
