// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracker configuration.
//!
//! A [`TrackerConfig`] can be built in code or loaded from a TOML, YAML or
//! JSON file. Values from `IPTIME_`-prefixed environment variables
//! override the file, e.g. `IPTIME_PASSWORD` or `IPTIME_SCAN_INTERVAL_SECS`.
//!
//! ```toml
//! url = "192.168.0.1"
//! username = "admin"
//! password = "secret"
//!
//! [[targets]]
//! name = "phone"
//! mac = "AA:BB:CC:00:11:22"
//! ```

use std::path::Path;
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat, Source};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::protocol::RouterConfig;
use crate::tracker::{Thresholds, TrackedTarget};
use crate::types::MacAddress;

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "IPTIME";

/// One device to track.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetConfig {
    /// Name used in the host name `iptime_<name>`.
    pub name: String,
    /// MAC address in colon, dash or bare hex notation.
    pub mac: String,
}

/// Everything needed to track devices on one router.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// Router address.
    pub url: String,
    /// Router account name.
    pub username: String,
    /// Router account password.
    pub password: String,
    /// Devices to track.
    pub targets: Vec<TargetConfig>,
    /// Seconds between ticks.
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Shortest time between two real polls, in seconds.
    #[serde(default = "default_min_poll_interval_secs")]
    pub min_poll_interval_secs: u64,
    /// Failed polls tolerated before a target becomes `N/A`.
    #[serde(default = "default_error_threshold")]
    pub error_threshold: u32,
    /// Missed polls tolerated before a target becomes `not_home`.
    #[serde(default = "default_not_home_threshold")]
    pub not_home_threshold: u32,
    /// Stations with a weaker signal (dBm) are ignored.
    #[serde(default = "default_rssi_limit")]
    pub rssi_limit: Option<i32>,
}

fn default_scan_interval_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_min_poll_interval_secs() -> u64 {
    4
}

fn default_error_threshold() -> u32 {
    3
}

fn default_not_home_threshold() -> u32 {
    1
}

#[allow(clippy::unnecessary_wraps)]
fn default_rssi_limit() -> Option<i32> {
    Some(-81)
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("targets", &self.targets)
            .field("scan_interval_secs", &self.scan_interval_secs)
            .field("timeout_secs", &self.timeout_secs)
            .field("min_poll_interval_secs", &self.min_poll_interval_secs)
            .field("error_threshold", &self.error_threshold)
            .field("not_home_threshold", &self.not_home_threshold)
            .field("rssi_limit", &self.rssi_limit)
            .finish()
    }
}

impl TrackerConfig {
    /// Creates a configuration with default intervals and no targets.
    ///
    /// # Examples
    ///
    /// ```
    /// use iptime_tracker::TrackerConfig;
    ///
    /// let config = TrackerConfig::new("192.168.0.1", "admin", "secret")
    ///     .with_target("phone", "AA:BB:CC:00:11:22");
    ///
    /// assert!(config.validate().is_ok());
    /// assert_eq!(config.router_config().base_url(), "http://192.168.0.1");
    /// ```
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            targets: Vec::new(),
            scan_interval_secs: default_scan_interval_secs(),
            timeout_secs: default_timeout_secs(),
            min_poll_interval_secs: default_min_poll_interval_secs(),
            error_threshold: default_error_threshold(),
            not_home_threshold: default_not_home_threshold(),
            rssi_limit: default_rssi_limit(),
        }
    }

    /// Adds a target.
    #[must_use]
    pub fn with_target(mut self, name: impl Into<String>, mac: impl Into<String>) -> Self {
        self.targets.push(TargetConfig {
            name: name.into(),
            mac: mac.into(),
        });
        self
    }

    /// Sets the tick interval.
    #[must_use]
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.scan_interval_secs = interval.as_secs();
        self
    }

    /// Sets the shortest time between two real polls.
    #[must_use]
    pub fn with_min_poll_interval(mut self, interval: Duration) -> Self {
        self.min_poll_interval_secs = interval.as_secs();
        self
    }

    /// Sets the signal cutoff; `None` keeps every station.
    #[must_use]
    pub fn with_rssi_limit(mut self, limit: Option<i32>) -> Self {
        self.rssi_limit = limit;
        self
    }

    /// Loads a configuration file, applying environment overrides.
    ///
    /// The format is taken from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be read or
    /// deserialized, and the errors of [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        Self::load_sources(File::from(path), None)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
            .and_then(Self::finish)
    }

    /// Layers the environment over `file`. `env` replaces the process
    /// environment when given.
    fn load_sources<S>(
        file: S,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Config, ::config::ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
    }

    /// Parses a TOML document, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the text cannot be deserialized,
    /// and the errors of [`validate`](Self::validate).
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a scanner.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an empty URL, account name or
    /// target list and [`ConfigError::Invalid`] for a malformed target or
    /// a zero interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Missing("url".to_string()));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Missing("username".to_string()));
        }
        if self.targets.is_empty() {
            return Err(ConfigError::Missing("targets".to_string()));
        }

        for (i, target) in self.targets.iter().enumerate() {
            if target.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: format!("targets[{i}].name"),
                    message: "must not be empty".to_string(),
                });
            }
            MacAddress::parse(&target.mac).map_err(|e| ConfigError::Invalid {
                field: format!("targets[{i}].mac"),
                message: e.to_string(),
            })?;
        }

        for (field, value) in [
            ("scan_interval_secs", self.scan_interval_secs),
            ("timeout_secs", self.timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Returns the HTTP settings for the router.
    #[must_use]
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig::new(&self.url)
            .with_credentials(&self.username, &self.password)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Returns the debounce thresholds.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            error: self.error_threshold,
            not_home: self.not_home_threshold,
        }
    }

    /// Returns the tick interval.
    #[must_use]
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Returns the shortest time between two real polls.
    #[must_use]
    pub fn min_poll_interval(&self) -> Duration {
        Duration::from_secs(self.min_poll_interval_secs)
    }

    /// Builds the tracked targets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a target MAC is malformed.
    pub fn tracked_targets(&self) -> Result<Vec<TrackedTarget>, ConfigError> {
        self.targets
            .iter()
            .enumerate()
            .map(|(i, target)| {
                let mac = MacAddress::parse(&target.mac).map_err(|e| ConfigError::Invalid {
                    field: format!("targets[{i}].mac"),
                    message: e.to_string(),
                })?;
                Ok(TrackedTarget::new(&target.name, mac, self.thresholds()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
        url = "192.168.0.1"
        username = "admin"
        password = "secret"
        rssi_limit = -75

        [[targets]]
        name = "phone"
        mac = "aa:bb:cc:00:11:22"

        [[targets]]
        name = "tablet"
        mac = "AA-BB-CC-00-11-23"
    "#;

    #[test]
    fn environment_overrides_file() {
        let mut env = ::config::Map::new();
        env.insert("IPTIME_PASSWORD".to_string(), "from_env".to_string());
        env.insert("IPTIME_SCAN_INTERVAL_SECS".to_string(), "9".to_string());
        env.insert("OTHER_PASSWORD".to_string(), "ignored".to_string());

        let settings =
            TrackerConfig::load_sources(File::from_str(TOML, FileFormat::Toml), Some(env)).unwrap();
        let config = TrackerConfig::finish(settings).unwrap();

        assert_eq!(config.password, "from_env");
        assert_eq!(config.scan_interval(), Duration::from_secs(9));
        assert_eq!(config.username, "admin");
    }

    #[test]
    fn empty_environment_keeps_file_values() {
        let settings = TrackerConfig::load_sources(
            File::from_str(TOML, FileFormat::Toml),
            Some(::config::Map::new()),
        )
        .unwrap();
        let config = TrackerConfig::finish(settings).unwrap();
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config = TrackerConfig::from_toml(TOML).unwrap();
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.scan_interval(), Duration::from_secs(5));
        assert_eq!(config.min_poll_interval(), Duration::from_secs(4));
        assert_eq!(config.thresholds(), Thresholds::default());
        assert_eq!(config.rssi_limit, Some(-75));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn builds_targets() {
        let config = TrackerConfig::from_toml(TOML).unwrap();
        let targets = config.tracked_targets().unwrap();
        assert_eq!(targets[0].name(), "phone");
        assert_eq!(targets[0].mac().to_string(), "AA-BB-CC-00-11-22");
    }

    #[test]
    fn missing_targets_is_rejected() {
        let err = TrackerConfig::new("192.168.0.1", "admin", "pw").validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(field) if field == "targets"));
    }

    #[test]
    fn bad_mac_names_the_field() {
        let config = TrackerConfig::new("192.168.0.1", "admin", "pw")
            .with_target("phone", "AA:BB:CC:00:11:22")
            .with_target("broken", "not-a-mac");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "targets[1].mac"));
    }

    #[test]
    fn empty_url_is_rejected() {
        let config = TrackerConfig::new(" ", "admin", "pw").with_target("phone", "AA:BB:CC:00:11:22");
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = TrackerConfig::new("192.168.0.1", "admin", "pw")
            .with_target("phone", "AA:BB:CC:00:11:22")
            .with_scan_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_document() {
        assert!(matches!(
            TrackerConfig::from_toml("url = "),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let config = TrackerConfig::new("192.168.0.1", "admin", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn router_config_uses_timeout() {
        let mut config = TrackerConfig::new("192.168.0.1", "admin", "pw");
        config.timeout_secs = 2;
        assert_eq!(config.router_config().timeout(), Duration::from_secs(2));
    }
}
