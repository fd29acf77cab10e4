// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presence state reported to the host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Presence of a tracked device.
///
/// The string forms (`home`, `not_home`, `N/A`) are what the host's
/// presence subsystem expects as location names.
///
/// # Examples
///
/// ```
/// use iptime_tracker::types::PresenceState;
///
/// assert_eq!(PresenceState::default(), PresenceState::Unavailable);
/// assert_eq!(PresenceState::NotHome.as_str(), "not_home");
/// assert_eq!("home".parse::<PresenceState>().unwrap(), PresenceState::Home);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PresenceState {
    /// Associated with the router.
    #[serde(rename = "home")]
    Home,
    /// Not seen in the station list.
    #[serde(rename = "not_home")]
    NotHome,
    /// Presence cannot be determined.
    #[default]
    #[serde(rename = "N/A")]
    Unavailable,
}

impl PresenceState {
    /// Returns the host-facing string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::NotHome => "not_home",
            Self::Unavailable => "N/A",
        }
    }

    /// Returns true if the device is at home.
    #[must_use]
    pub const fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }
}

impl fmt::Display for PresenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresenceState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "home" => Ok(Self::Home),
            "not_home" => Ok(Self::NotHome),
            "N/A" | "n/a" | "unavailable" => Ok(Self::Unavailable),
            other => Err(ValueError::InvalidPresenceState(other.to_string())),
        }
    }
}
