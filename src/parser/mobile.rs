// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsers for the mobile UI (`/cgi/iux_get.cgi` JSON).

use serde_json::Value;

use crate::error::ParseError;
use crate::parser::value::{parse_body, str_field, u64_field};
use crate::station::StationRecord;
use crate::types::{Band, MacAddress, StayTime};

/// Parses a per-band `stalist` response.
///
/// Entries without a `mac` member are summary rows and are skipped.
///
/// # Errors
///
/// Returns [`ParseError::SessionExpired`] if the body is not JSON or has
/// no `stalist` (the firmware answers with a login script once the session
/// is gone), and [`ParseError::UnexpectedFormat`] if `stalist` is not an
/// array.
///
/// # Examples
///
/// ```
/// use iptime_tracker::parser::mobile;
/// use iptime_tracker::types::Band;
///
/// let body = r#"{"stalist":[{"mac":"00-11-22-33-44-55","ipaddr":"192.168.0.3",
///                "day":"0","hour":"1","min":"2","sec":"3","pcname":"tablet"}]}"#;
/// let stations = mobile::parse_station_list(body, &Band::TwoPointFour).unwrap();
/// assert_eq!(stations[0].stay_time.to_string(), "0d 01:02:03");
/// ```
pub fn parse_station_list(body: &str, band: &Band) -> Result<Vec<StationRecord>, ParseError> {
    let json = parse_body(body, "station list")?;
    let list = json
        .get("stalist")
        .ok_or_else(|| ParseError::SessionExpired(format!("no stalist for {band}")))?;
    let entries = list
        .as_array()
        .ok_or_else(|| ParseError::UnexpectedFormat("stalist is not an array".to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| station(entry, band))
        .collect())
}

fn station(entry: &Value, band: &Band) -> Option<StationRecord> {
    let raw_mac = str_field(entry, "mac")?;
    let Ok(mac) = MacAddress::parse(raw_mac) else {
        tracing::debug!(mac = raw_mac, "skipping station with malformed MAC");
        return None;
    };

    let stay_time = StayTime::from_parts(
        u64_field(entry, "day").unwrap_or(0),
        u64_field(entry, "hour").unwrap_or(0),
        u64_field(entry, "min").unwrap_or(0),
        u64_field(entry, "sec").unwrap_or(0),
    );

    Some(
        StationRecord::new(mac, band.clone(), stay_time)
            .with_ip_text(str_field(entry, "ipaddr"))
            .with_hostname(str_field(entry, "pcname")),
    )
}

/// Reports whether the system status response has an `easymesh` section.
///
/// Unparsable bodies count as "no mesh".
#[must_use]
pub fn mesh_enabled(body: &str) -> bool {
    serde_json::from_str::<Value>(body.trim())
        .ok()
        .is_some_and(|json| json.get("easymesh").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "stalist": [
            {"mac": "5C:E9:1E:01:02:03", "ipaddr": "192.168.0.21", "pcname": "iPhone",
             "day": "2", "hour": "3", "min": "4", "sec": "5"},
            {"mac": "70-3A-CB-AA-BB-CC", "ipaddr": "", "day": 0, "hour": 0, "min": 10, "sec": 0},
            {"count": 2}
        ]
    }"#;

    #[test]
    fn parses_entries_with_mac() {
        let stations = parse_station_list(FIXTURE, &Band::Five).unwrap();
        assert_eq!(stations.len(), 2);

        assert_eq!(stations[0].mac.to_string(), "5C-E9-1E-01-02-03");
        assert_eq!(stations[0].ip, Some("192.168.0.21".parse().unwrap()));
        assert_eq!(stations[0].hostname.as_deref(), Some("iPhone"));
        assert_eq!(stations[0].stay_time.to_string(), "2d 03:04:05");
        assert_eq!(stations[0].band, Band::Five);
    }

    #[test]
    fn empty_ipaddr_is_none() {
        let stations = parse_station_list(FIXTURE, &Band::Five).unwrap();
        assert!(stations[1].ip.is_none());
        assert_eq!(stations[1].stay_time.to_string(), "0d 00:10:00");
    }

    #[test]
    fn empty_list_is_valid() {
        let stations = parse_station_list(r#"{"stalist": []}"#, &Band::Five).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn missing_stalist_is_session_expired() {
        let err = parse_station_list(r#"{"result": "fail"}"#, &Band::Five).unwrap_err();
        assert!(err.is_session_expired());
    }

    #[test]
    fn login_script_is_session_expired() {
        let body = r#"<html><script>parent.parent.location = "/m_login.cgi?noauto=1"; //session_timeout </script></html>"#;
        assert!(parse_station_list(body, &Band::Five).unwrap_err().is_session_expired());
    }

    #[test]
    fn oversized_day_does_not_overflow() {
        let body = r#"{"stalist": [{"mac": "00-11-22-33-44-55", "day": "300000000000000",
                       "hour": "1", "min": "0", "sec": "0"}]}"#;
        let stations = parse_station_list(body, &Band::Five).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(
            stations[0].stay_time.duration(),
            Some(std::time::Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn stalist_wrong_type() {
        let err = parse_station_list(r#"{"stalist": "none"}"#, &Band::Five).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedFormat(_)));
    }

    #[test]
    fn mesh_section_detection() {
        assert!(mesh_enabled(r#"{"easymesh": {"role": "controller"}, "product": "AX3000M"}"#));
        assert!(!mesh_enabled(r#"{"product": "A3004NS"}"#));
        assert!(!mesh_enabled("<html></html>"));
    }
}
