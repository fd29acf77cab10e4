// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient accessors for router JSON.
//!
//! The firmware encodes numbers as JSON numbers on some builds and as
//! strings on others, so every numeric field goes through these helpers.

use serde_json::Value;

use crate::error::ParseError;

/// Parses a body as JSON, treating anything else as a stale session page.
pub(crate) fn parse_body(body: &str, what: &str) -> Result<Value, ParseError> {
    serde_json::from_str(body.trim())
        .map_err(|e| ParseError::SessionExpired(format!("{what} is not JSON: {e}")))
}

// Fractional values only show up as whole seconds or counters.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn u64_field(entry: &Value, key: &str) -> Option<u64> {
    match entry.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn i64_field(entry: &Value, key: &str) -> Option<i64> {
    match entry.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn i32_field(entry: &Value, key: &str) -> Option<i32> {
    i64_field(entry, key).and_then(|v| i32::try_from(v).ok())
}

pub(crate) fn str_field<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings() {
        let v = json!({"a": 5, "b": "7", "c": " 9 ", "d": -3, "e": "x", "f": 2.0});
        assert_eq!(u64_field(&v, "a"), Some(5));
        assert_eq!(u64_field(&v, "b"), Some(7));
        assert_eq!(u64_field(&v, "c"), Some(9));
        assert_eq!(u64_field(&v, "d"), None);
        assert_eq!(i64_field(&v, "d"), Some(-3));
        assert_eq!(u64_field(&v, "e"), None);
        assert_eq!(u64_field(&v, "f"), Some(2));
        assert_eq!(u64_field(&v, "missing"), None);
    }

    #[test]
    fn blank_strings_are_none() {
        let v = json!({"ip": "", "name": "tv"});
        assert_eq!(str_field(&v, "ip"), None);
        assert_eq!(str_field(&v, "name"), Some("tv"));
    }

    #[test]
    fn non_json_body_is_session_expired() {
        let err = parse_body("<html></html>", "station list").unwrap_err();
        assert!(err.is_session_expired());
    }
}
