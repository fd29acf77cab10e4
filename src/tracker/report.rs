// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing presence reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::target::{Sighting, TrackedTarget};
use crate::types::PresenceState;

/// Source type attached to every report.
pub const SOURCE_TYPE: &str = "ipTIME_Tracker";

/// Placeholder for attributes the router did not report.
pub const UNKNOWN: &str = "N/A";

/// Attributes describing the target's association.
///
/// `stay_time`, `band` and `ip` are absent when the last poll produced no
/// station list and read `N/A` when the list did not contain the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceAttributes {
    /// Configured target name.
    pub name: String,
    /// Target MAC in `AA-BB-CC-DD-EE-FF` form.
    pub mac_address: String,
    /// Connection duration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stay_time: Option<String>,
    /// Radio band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,
    /// IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Signal strength in dBm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    /// Bytes sent to the station.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_bytes: Option<u64>,
    /// Bytes received from the station.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_bytes: Option<u64>,
    /// Router base URL.
    pub iptime_url: String,
}

/// One presence update for the host's device tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceReport {
    /// Stable identifier: slugified router URL and target MAC.
    pub device_id: String,
    /// Tracker MAC: `<router url>_<target mac>`.
    pub mac: String,
    /// Host name: `iptime_<name>`.
    pub host_name: String,
    /// Location name.
    pub location_name: PresenceState,
    /// Association details.
    pub attributes: PresenceAttributes,
    /// Always [`SOURCE_TYPE`].
    pub source_type: &'static str,
    /// When the target was last in a station list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

impl PresenceReport {
    /// Builds the report for a target polled from `router_url`.
    #[must_use]
    pub fn new(router_url: &str, target: &TrackedTarget) -> Self {
        let mac = target.mac().to_string();

        Self {
            device_id: device_id(router_url, &mac),
            mac: format!("{router_url}_{mac}"),
            host_name: format!("iptime_{}", target.name()),
            location_name: target.state(),
            attributes: attributes(router_url, target, mac),
            source_type: SOURCE_TYPE,
            last_seen: target.last_seen(),
        }
    }
}

fn attributes(router_url: &str, target: &TrackedTarget, mac: String) -> PresenceAttributes {
    let mut attributes = PresenceAttributes {
        name: target.name().to_string(),
        mac_address: mac,
        stay_time: None,
        band: None,
        ip: None,
        signal: None,
        tx_bytes: None,
        rx_bytes: None,
        iptime_url: router_url.to_string(),
    };

    match target.sighting() {
        Sighting::NoData => {}
        Sighting::Missing => {
            attributes.stay_time = Some(UNKNOWN.to_string());
            attributes.band = Some(UNKNOWN.to_string());
            attributes.ip = Some(UNKNOWN.to_string());
        }
        Sighting::Seen(record) => {
            attributes.stay_time = Some(record.stay_time.to_string());
            attributes.band = Some(record.band.to_string());
            attributes.ip = Some(
                record
                    .ip
                    .map_or_else(|| UNKNOWN.to_string(), |ip| ip.to_string()),
            );
            attributes.signal = record.signal;
            attributes.tx_bytes = record.tx_bytes;
            attributes.rx_bytes = record.rx_bytes;
        }
    }

    attributes
}

/// Builds the tracker device id from the router URL and target MAC.
#[must_use]
pub fn device_id(router_url: &str, mac: &str) -> String {
    format!("{}_{}", slugify(router_url), slugify(mac))
}

/// Lowercases and joins alphanumeric runs with single underscores.
///
/// ```
/// use iptime_tracker::tracker::slugify;
///
/// assert_eq!(slugify("http://192.168.0.1"), "http_192_168_0_1");
/// assert_eq!(slugify("AA-BB-CC-00-11-22"), "aa_bb_cc_00_11_22");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
