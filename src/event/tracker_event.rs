// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracker event types.

use serde::Serialize;

use crate::types::PresenceState;
use crate::variant::UiVariant;

/// Events emitted by the scanner.
///
/// Presence reports go to the host on every tick; events are only
/// published when something changed.
///
/// # Examples
///
/// ```
/// use iptime_tracker::event::TrackerEvent;
/// use iptime_tracker::types::PresenceState;
///
/// let event = TrackerEvent::presence_changed(
///     "http_192_168_0_1_aa_bb_cc_00_11_22",
///     "phone",
///     PresenceState::Unavailable,
///     PresenceState::Home,
/// );
/// assert!(event.is_presence());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    /// A target's debounced presence changed.
    PresenceChanged {
        /// Tracker device id of the target.
        device_id: String,
        /// Configured target name.
        name: String,
        /// State before the poll.
        from: PresenceState,
        /// State after the poll.
        to: PresenceState,
    },

    /// The router became reachable or unreachable.
    RouterAvailability {
        /// Router base URL.
        url: String,
        /// Whether polls are succeeding again.
        available: bool,
        /// Last failure, when unavailable.
        error: Option<String>,
    },

    /// A new router session was opened.
    SessionEstablished {
        /// Router base URL.
        url: String,
        /// Detected UI variant.
        variant: UiVariant,
        /// Whether mesh stations are fetched.
        mesh: bool,
    },

    /// The router session was closed after an expiry or failure.
    SessionLost {
        /// Router base URL.
        url: String,
        /// Why the session was dropped.
        reason: String,
    },
}

impl TrackerEvent {
    /// Creates a presence changed event.
    #[must_use]
    pub fn presence_changed(
        device_id: impl Into<String>,
        name: impl Into<String>,
        from: PresenceState,
        to: PresenceState,
    ) -> Self {
        Self::PresenceChanged {
            device_id: device_id.into(),
            name: name.into(),
            from,
            to,
        }
    }

    /// Creates a router available event.
    #[must_use]
    pub fn router_available(url: impl Into<String>) -> Self {
        Self::RouterAvailability {
            url: url.into(),
            available: true,
            error: None,
        }
    }

    /// Creates a router unavailable event.
    #[must_use]
    pub fn router_unavailable(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self::RouterAvailability {
            url: url.into(),
            available: false,
            error: Some(error.into()),
        }
    }

    /// Returns `true` if this is a presence event.
    #[must_use]
    pub fn is_presence(&self) -> bool {
        matches!(self, Self::PresenceChanged { .. })
    }

    /// Returns `true` if this is a session lifecycle event.
    #[must_use]
    pub fn is_session(&self) -> bool {
        matches!(
            self,
            Self::SessionEstablished { .. } | Self::SessionLost { .. }
        )
    }
}
