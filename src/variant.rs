// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Firmware UI variant classification.
//!
//! ipTIME firmware has shipped three incompatible administrative UIs.
//! Which one a router serves is decided from two unauthenticated pages:
//! the Beta UI entry page and `hostinfo2.cgi`, whose `iux` flags say
//! whether the mobile UI is available.
//!
//! # Examples
//!
//! ```
//! use iptime_tracker::variant::{HostInfo, UiVariant};
//!
//! let info = HostInfo::parse("product_name=A3004NS-M\niux=1\niux_package_installed=1\n");
//! assert_eq!(info.product_name.as_deref(), Some("A3004NS"));
//! assert_eq!(info.classify().unwrap(), UiVariant::Mobile);
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LoginError;

static PRODUCT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"product_name=([ a-zA-Z0-9]+)").expect("valid regex"));
static IUX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"iux=(\d)").expect("valid regex"));
static IUX_INSTALLED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"iux_package_installed=(\d)").expect("valid regex"));

/// The administrative UI generation a router serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiVariant {
    /// Desktop UI under `/sess-bin/`, HTML station tables.
    Legacy,
    /// Mobile UI under `/cgi/iux_get.cgi`, JSON station lists.
    Mobile,
    /// Single-page UI under `/ui/` backed by the JSON service.
    Beta,
}

impl UiVariant {
    /// Returns a short lowercase name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Mobile => "mobile",
            Self::Beta => "beta",
        }
    }
}

impl fmt::Display for UiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts read from `/login/hostinfo2.cgi`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostInfo {
    /// Router model, e.g. `A3004NS`.
    pub product_name: Option<String>,
    /// Whether the page mentions `iux` at all.
    pub mentions_iux: bool,
    /// Whether the page mentions `iux_package_installed`.
    pub mentions_package: bool,
    /// Value of `iux=<digit>`.
    pub iux: Option<u8>,
    /// Value of `iux_package_installed=<digit>`.
    pub iux_package_installed: Option<u8>,
}

impl HostInfo {
    /// Extracts the host information fields from the page body.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let digit = |re: &Regex| {
            re.captures(body)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        };

        Self {
            product_name: PRODUCT_NAME_RE
                .captures(body)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .filter(|name| !name.is_empty()),
            mentions_iux: body.contains("iux"),
            mentions_package: body.contains("iux_package_installed"),
            iux: digit(&IUX_RE),
            iux_package_installed: digit(&IUX_INSTALLED_RE),
        }
    }

    /// Picks the UI variant these flags describe.
    ///
    /// Firmware that never heard of `iux` only has the desktop UI; firmware
    /// that mentions `iux` but not the package has the mobile UI built in.
    /// Otherwise the mobile UI is usable only when both flags are set.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::DetectionFailed`] when the flags are mentioned
    /// but their values cannot be read.
    pub fn classify(&self) -> Result<UiVariant, LoginError> {
        if !self.mentions_iux {
            return Ok(UiVariant::Legacy);
        }
        if !self.mentions_package {
            return Ok(UiVariant::Mobile);
        }

        match (self.iux, self.iux_package_installed) {
            (Some(iux), Some(installed)) if iux != 0 && installed != 0 => Ok(UiVariant::Mobile),
            (Some(iux), Some(_)) if iux != 0 => {
                tracing::info!(
                    product = self.product_name.as_deref().unwrap_or("unknown"),
                    "mobile UI package is not installed, using the desktop UI"
                );
                Ok(UiVariant::Legacy)
            }
            (Some(_), Some(_)) => Ok(UiVariant::Legacy),
            _ => Err(LoginError::DetectionFailed(
                "unreadable iux flags in hostinfo".to_string(),
            )),
        }
    }
}
