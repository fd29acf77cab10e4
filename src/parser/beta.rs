// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsers for the Beta UI JSON service (`/cgi/service.cgi`).
//!
//! Every call is a `{"method": ..., "params": ...}` request answered by
//! either `{"result": ...}` or `{"error": {"code": .., "message": ..}}`.

use serde_json::{Value, json};

use crate::error::{LoginError, ParseError};
use crate::parser::value::{i32_field, parse_body, str_field, u64_field};
use crate::station::StationRecord;
use crate::types::{Band, MacAddress, StayTime};

/// Service method that opens a session.
pub const LOGIN_METHOD: &str = "session/login";
/// Service method that closes the session.
pub const LOGOUT_METHOD: &str = "session/logout";
/// Service method that lists associated stations on every band.
pub const STATION_METHOD: &str = "wifi/station/list";

/// Builds a service request body.
#[must_use]
pub fn request(method: &str, params: Value) -> Value {
    json!({ "method": method, "params": params })
}

/// Builds the login request body.
#[must_use]
pub fn login_request(username: &str, password: &str) -> Value {
    request(LOGIN_METHOD, json!({ "id": username, "pw": password }))
}

/// Extracts the session token from a login response body.
///
/// The cookie set alongside the response takes precedence; this handles
/// builds that return the token as `result.session_id` instead.
///
/// # Errors
///
/// Returns [`LoginError::BadCredentials`] when the service answered with an
/// `error` member and [`LoginError::NoToken`] when the body carries no
/// token.
pub fn login_token(body: &str) -> Result<String, LoginError> {
    let json: Value = serde_json::from_str(body.trim()).map_err(|_| LoginError::NoToken)?;
    if json.get("error").is_some_and(|e| !e.is_null()) {
        return Err(LoginError::BadCredentials);
    }
    json.get("result")
        .and_then(|r| str_field(r, "session_id"))
        .map(ToString::to_string)
        .ok_or(LoginError::NoToken)
}

/// Parses a `wifi/station/list` response.
///
/// # Errors
///
/// Returns [`ParseError::SessionExpired`] if the body is not JSON or the
/// service error refers to the session, and [`ParseError::MissingField`]
/// or [`ParseError::UnexpectedFormat`] for other service errors and
/// malformed responses.
///
/// # Examples
///
/// ```
/// use iptime_tracker::parser::beta;
///
/// let body = r#"{"result":[{"mac":"00:11:22:33:44:55","ip":"192.168.0.9","band":"5g",
///                "rssi":-48,"connected":90061,"tx_bytes":1024,"rx_bytes":2048}]}"#;
/// let stations = beta::parse_station_list(body).unwrap();
/// assert_eq!(stations[0].signal, Some(-48));
/// assert_eq!(stations[0].stay_time.to_string(), "1d 01:01:01");
/// ```
pub fn parse_station_list(body: &str) -> Result<Vec<StationRecord>, ParseError> {
    let json = parse_body(body, "station list")?;

    if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
        let message = str_field(error, "message").unwrap_or("unknown error");
        let reason = format!("service rejected {STATION_METHOD}: {message}");
        return Err(if is_auth_error(error) {
            ParseError::SessionExpired(reason)
        } else {
            ParseError::UnexpectedFormat(reason)
        });
    }

    let result = json
        .get("result")
        .ok_or_else(|| ParseError::MissingField("result".to_string()))?;
    let entries = result
        .as_array()
        .or_else(|| result.get("list").and_then(Value::as_array))
        .ok_or_else(|| ParseError::UnexpectedFormat("result is not a station array".to_string()))?;

    Ok(entries.iter().filter_map(station).collect())
}

/// Service error code for a missing or expired session.
const AUTH_ERROR_CODE: i64 = -32001;

const AUTH_WORDS: [&str; 4] = ["session", "auth", "login", "token"];

fn is_auth_error(error: &Value) -> bool {
    if error.get("code").and_then(Value::as_i64) == Some(AUTH_ERROR_CODE) {
        return true;
    }
    str_field(error, "message").is_some_and(|message| {
        let message = message.to_ascii_lowercase();
        AUTH_WORDS.iter().any(|word| message.contains(word))
    })
}

fn station(entry: &Value) -> Option<StationRecord> {
    let raw_mac = str_field(entry, "mac")?;
    let Ok(mac) = MacAddress::parse(raw_mac) else {
        tracing::debug!(mac = raw_mac, "skipping station with malformed MAC");
        return None;
    };

    let band = str_field(entry, "band").map_or_else(|| Band::Other("-".to_string()), Band::from_label);
    let stay_time = StayTime::from_secs(u64_field(entry, "connected").unwrap_or(0));

    Some(
        StationRecord::new(mac, band, stay_time)
            .with_ip_text(str_field(entry, "ip"))
            .with_hostname(str_field(entry, "name"))
            .with_signal(i32_field(entry, "rssi"))
            .with_traffic(u64_field(entry, "tx_bytes"), u64_field(entry, "rx_bytes")),
    )
}

/// Reports whether the Beta UI entry page is being served.
///
/// The entry page is a single-page app that talks to `service.cgi`;
/// older firmware answers `/ui/` with a redirect script or a 404.
#[must_use]
pub fn is_beta_ui(body: &str) -> bool {
    body.contains("service.cgi")
}
