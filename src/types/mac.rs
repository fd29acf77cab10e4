// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized MAC addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;

/// A 48-bit MAC address.
///
/// Router pages print MACs in different shapes (`aa:bb:..`, `AA-BB-..`),
/// so every address is normalized on construction. The canonical text form
/// is upper-case and dash separated, matching the station tables.
///
/// # Examples
///
/// ```
/// use iptime_tracker::types::MacAddress;
///
/// let a: MacAddress = "aa:bb:cc:00:11:22".parse().unwrap();
/// let b: MacAddress = "AA-BB-CC-00-11-22".parse().unwrap();
/// let c: MacAddress = "aabbcc001122".parse().unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// assert_eq!(a.to_string(), "AA-BB-CC-00-11-22");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a MAC address from raw octets.
    #[must_use]
    pub const fn from_octets(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Parses a MAC address in any of the accepted notations.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidMacAddress`] if the input does not hold
    /// exactly twelve hex digits in colon, dash or bare notation.
    pub fn parse(input: &str) -> Result<Self, ValueError> {
        let trimmed = input.trim();
        let invalid = || ValueError::InvalidMacAddress(trimmed.to_string());

        let digits: String = if trimmed.contains([':', '-']) {
            let groups: Vec<&str> = trimmed.split([':', '-']).collect();
            if groups.len() != 6 || groups.iter().any(|g| g.len() != 2) {
                return Err(invalid());
            }
            groups.concat()
        } else {
            trimmed.to_string()
        };

        if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}-{b:02X}-{c:02X}-{d:02X}-{e:02X}-{g:02X}")
    }
}

impl FromStr for MacAddress {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
