// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! How long a station has been associated.
//!
//! The JSON UIs report the connected time as numbers (either split into
//! day/hour/min/sec fields or as a pair of timestamps), while the legacy
//! HTML table prints a preformatted string. Both end up as [`StayTime`].
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use iptime_tracker::types::StayTime;
//!
//! let stay = StayTime::from_parts(1, 2, 3, 4);
//! assert_eq!(stay.duration(), Some(Duration::from_secs(93_784)));
//! assert_eq!(stay.to_string(), "1d 02:03:04");
//!
//! let raw = StayTime::raw("3 days 01:00:00");
//! assert_eq!(raw.duration(), None);
//! assert_eq!(raw.to_string(), "3 days 01:00:00");
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

const SECS_PER_DAY: u64 = 86_400;

/// Connected duration of a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StayTime {
    /// A duration computed from numeric fields.
    Elapsed(Duration),
    /// Text printed by the router that is passed through unchanged.
    Raw(String),
}

impl StayTime {
    /// Builds a stay time from whole seconds.
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        Self::Elapsed(Duration::from_secs(secs))
    }

    /// Builds a stay time from day/hour/minute/second fields.
    ///
    /// Out-of-range router values saturate at `u64::MAX` seconds.
    #[must_use]
    pub fn from_parts(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        let secs = days
            .saturating_mul(SECS_PER_DAY)
            .saturating_add(hours.saturating_mul(3600))
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(seconds);
        Self::from_secs(secs)
    }

    /// Wraps router-formatted text.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into().trim().to_string())
    }

    /// Returns the duration when it is known numerically.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::Elapsed(d) => Some(*d),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for StayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elapsed(d) => {
                let total = d.as_secs();
                let days = total / SECS_PER_DAY;
                let rem = total % SECS_PER_DAY;
                write!(
                    f,
                    "{days}d {:02}:{:02}:{:02}",
                    rem / 3600,
                    (rem % 3600) / 60,
                    rem % 60
                )
            }
            Self::Raw(text) => f.write_str(text),
        }
    }
}

impl Serialize for StayTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
