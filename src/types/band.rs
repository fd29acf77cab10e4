// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Radio band a station is associated on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Radio band of a Wi-Fi station.
///
/// Per-band station pages map to [`Band::TwoPointFour`] and
/// [`Band::Five`]; mesh topology entries report the satellite's own mode
/// string, which is kept as [`Band::Other`] when it is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    /// 2.4 GHz radio.
    TwoPointFour,
    /// 5 GHz radio.
    Five,
    /// 6 GHz radio.
    Six,
    /// Band reported verbatim by the router.
    Other(String),
}

impl Band {
    /// Interprets a band label as printed by the router.
    ///
    /// Accepts the short forms used by the JSON UIs (`2g`, `5g`, `6g`) as
    /// well as `2.4GHz` style labels; anything else is kept verbatim.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase().replace([' ', '_'], "");
        match normalized.as_str() {
            "2g" | "2.4g" | "2.4ghz" | "2ghz" | "24g" => Self::TwoPointFour,
            "5g" | "5ghz" => Self::Five,
            "6g" | "6ghz" => Self::Six,
            _ => Self::Other(label.trim().to_string()),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoPointFour => f.write_str("2.4GHz"),
            Self::Five => f.write_str("5GHz"),
            Self::Six => f.write_str("6GHz"),
            Self::Other(label) => f.write_str(label),
        }
    }
}
