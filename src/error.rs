// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the ipTIME tracker.
//!
//! Nothing in a poll is fatal: these errors describe why a poll tick came
//! out inconclusive, and the scanner turns them into debounce-counter
//! updates rather than propagating them to the host.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to the router.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a router page.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Login against the router failed.
    #[error("login error: {0}")]
    Login(#[from] LoginError),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A MAC address could not be normalized.
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    /// An unknown presence state string was provided.
    #[error("invalid presence state: {0}")]
    InvalidPresenceState(String),
}

/// Errors related to HTTP communication with the router.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The router answered with a non-success status code.
    #[error("HTTP {status} from {path}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The requested path.
        path: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProtocolError {
    /// Converts a reqwest error, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_ms)
        } else {
            Self::Http(err)
        }
    }
}

/// Errors related to parsing router pages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// The page is not a station list; the router served a login page
    /// or an error because the session is no longer valid.
    #[error("session expired ({0})")]
    SessionExpired(String),
}

impl ParseError {
    /// Returns `true` if this error means the session token went stale.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }
}

/// Reasons a login attempt did not yield a session token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// The router rejected the account.
    #[error("login rejected, check the router account")]
    BadCredentials,

    /// The mobile login page redirected to the root, so the firmware
    /// does not actually serve the mobile UI.
    #[error("router redirected the mobile login, UI variant must be detected again")]
    VariantMismatch,

    /// The response carried no session token.
    #[error("no session token in login response")]
    NoToken,

    /// The firmware UI variant could not be determined.
    #[error("could not detect the router UI variant: {0}")]
    DetectionFailed(String),
}

/// Errors related to loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value is missing or empty.
    #[error("missing configuration value: {0}")]
    Missing(String),

    /// A value is present but invalid.
    #[error("invalid configuration value for {field}: {message}")]
    Invalid {
        /// The offending field.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// The configuration source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
