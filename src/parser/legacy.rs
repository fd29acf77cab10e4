// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsers for the legacy PC UI (`/sess-bin/timepro.cgi` pages).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::parser::markup;
use crate::station::StationRecord;
use crate::types::{Band, MacAddress, StayTime};

static IPV4_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("valid regex"));

/// Number of cells in a station row: MAC, name, connected time, address.
const STATION_CELLS: usize = 4;

/// Parses a per-band station table.
///
/// A page without any table row is the login redirect the firmware serves
/// once the session has expired.
///
/// # Errors
///
/// Returns [`ParseError::SessionExpired`] when the page holds no rows.
///
/// # Examples
///
/// ```
/// use iptime_tracker::parser::legacy;
/// use iptime_tracker::types::Band;
///
/// let html = r#"<table>
///   <tr><td colspan="4">Connected stations</td></tr>
///   <tr><td>00:11:22:33:44:55</td><td>phone</td><td>0 day 01:02:03</td>
///       <td><span class="gray">192.168.0.10</span></td></tr>
/// </table>"#;
///
/// let stations = legacy::parse_station_table(html, &Band::Five).unwrap();
/// assert_eq!(stations.len(), 1);
/// assert_eq!(stations[0].mac.to_string(), "00-11-22-33-44-55");
/// ```
pub fn parse_station_table(html: &str, band: &Band) -> Result<Vec<StationRecord>, ParseError> {
    let rows = markup::rows(html);
    if rows.is_empty() {
        return Err(ParseError::SessionExpired(format!(
            "no station table rows for {band}"
        )));
    }

    let mut stations = Vec::new();
    for row in rows {
        let cells = markup::cells(row);
        if cells.len() != STATION_CELLS {
            continue;
        }

        let Ok(mac) = MacAddress::parse(&cells[0]) else {
            tracing::debug!(cell = %cells[0], "skipping row without a MAC address");
            continue;
        };

        let ip = IPV4_RE.find(&cells[3]).map(|m| m.as_str());
        stations.push(
            StationRecord::new(mac, band.clone(), StayTime::raw(cells[2].as_str()))
                .with_hostname(Some(cells[1].as_str()))
                .with_ip_text(ip),
        );
    }

    Ok(stations)
}

/// Reports whether the mesh configuration page shows mesh as enabled.
///
/// The page has a `mode_none` radio button; mesh is on when that button
/// exists and is not checked.
#[must_use]
pub fn mesh_enabled(html: &str) -> bool {
    markup::input_by_id(html, "mode_none").is_some_and(|attrs| !attrs.contains_key("checked"))
}
