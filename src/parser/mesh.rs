// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the mesh topology API (`/easymesh/api.cgi?key=topology`).

use serde_json::Value;

use crate::error::ParseError;
use crate::parser::value::{i32_field, i64_field, parse_body, str_field};
use crate::station::StationRecord;
use crate::types::{Band, MacAddress, StayTime};

/// Connection kinds that do not count as Wi-Fi association.
const IGNORED_CONNECTIONS: [&str; 2] = ["Unknown", "WIRED"];

/// Parses the `station` array of the topology response.
///
/// Only wireless entries are kept: entries without a `connection` member,
/// or whose connection is `Unknown` or `WIRED`, are skipped. The connected
/// time is `timestamp - connected_ts`, both in router seconds.
///
/// # Errors
///
/// Returns [`ParseError::SessionExpired`] if the body is not JSON or has
/// no `station` member, and [`ParseError::UnexpectedFormat`] if `station`
/// is not an array.
pub fn parse_topology(body: &str) -> Result<Vec<StationRecord>, ParseError> {
    let json = parse_body(body, "mesh topology")?;
    let entries = json
        .get("station")
        .ok_or_else(|| ParseError::SessionExpired("no station in mesh topology".to_string()))?
        .as_array()
        .ok_or_else(|| ParseError::UnexpectedFormat("station is not an array".to_string()))?;

    Ok(entries.iter().filter_map(station).collect())
}

fn station(entry: &Value) -> Option<StationRecord> {
    let connection = str_field(entry, "connection")?;
    if IGNORED_CONNECTIONS.contains(&connection) {
        return None;
    }

    let raw_mac = str_field(entry, "mac")?;
    let Ok(mac) = MacAddress::parse(raw_mac) else {
        tracing::debug!(mac = raw_mac, "skipping mesh station with malformed MAC");
        return None;
    };

    let connected_secs = match (
        i64_field(entry, "timestamp"),
        i64_field(entry, "connected_ts"),
    ) {
        (Some(now), Some(since)) => u64::try_from(now.saturating_sub(since)).unwrap_or(0),
        _ => 0,
    };

    let band = str_field(entry, "mode").map_or_else(
        || Band::Other(connection.to_string()),
        Band::from_label,
    );

    Some(
        StationRecord::new(mac, band, StayTime::from_secs(connected_secs))
            .with_ip_text(str_field(entry, "ip"))
            .with_hostname(str_field(entry, "hostname"))
            .with_signal(i32_field(entry, "rssi"))
            .from_mesh(),
    )
}

/// Reports whether a body is a usable topology response.
#[must_use]
pub fn is_topology(body: &str) -> bool {
    serde_json::from_str::<Value>(body.trim())
        .ok()
        .is_some_and(|json| json.get("station").is_some_and(Value::is_array))
}
