// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `iptime_tracker` - Presence tracking for ipTIME routers.
//!
//! This library logs into an ipTIME router's web interface, reads the
//! list of associated Wi-Fi stations and turns it into debounced
//! `home` / `not_home` / `N/A` states for a set of configured devices.
//!
//! # Supported Firmware
//!
//! - **Desktop UI** (`/sess-bin/`): HTML station tables
//! - **Mobile UI** (`/cgi/iux_get.cgi`): JSON station lists
//! - **Beta UI** (`/ui/`): JSON service calls
//! - **`EasyMesh`**: stations on satellites, via the topology API
//!
//! The variant is detected on every login, so firmware upgrades are
//! picked up without reconfiguration.
//!
//! # Quick Start
//!
//! ```no_run
//! use iptime_tracker::{PresenceReport, Scanner, TrackerConfig};
//!
//! #[tokio::main]
//! async fn main() -> iptime_tracker::Result<()> {
//!     let config = TrackerConfig::new("192.168.0.1", "admin", "secret")
//!         .with_target("phone", "AA:BB:CC:00:11:22");
//!
//!     let scanner = Scanner::new(config)?;
//!
//!     for report in scanner.tick().await {
//!         println!("{} is {}", report.host_name, report.location_name);
//!     }
//!
//!     scanner.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Continuous Tracking with Callbacks
//!
//! ```no_run
//! use iptime_tracker::{Scanner, TrackerConfig, subscription::Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> iptime_tracker::Result<()> {
//!     let scanner = Scanner::new(TrackerConfig::load("tracker.toml")?)?;
//!
//!     scanner.on_state_changed(|report, change| {
//!         println!("{}: {} -> {}", report.host_name, change.from, change.to);
//!     });
//!
//!     scanner.run(async { tokio::signal::ctrl_c().await.ok(); }).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod parser;
pub mod protocol;
mod scanner;
pub mod session;
pub mod station;
pub mod subscription;
pub mod tracker;
pub mod types;
pub mod variant;

pub use config::{TargetConfig, TrackerConfig};
pub use error::{ConfigError, Error, LoginError, ParseError, ProtocolError, Result, ValueError};
pub use event::{EventBus, EventStream, TrackerEvent};
pub use protocol::{RouterConfig, RouterHttp, RouterResponse};
pub use scanner::Scanner;
pub use session::{PollOutcome, RouterSession, SessionSnapshot};
pub use station::{StationList, StationRecord};
pub use subscription::{CallbackRegistry, LogSink, PresenceSink, Subscribable, SubscriptionId};
pub use tracker::{PresenceAttributes, PresenceChange, PresenceReport, Thresholds, TrackedTarget};
pub use types::{Band, MacAddress, PresenceState, StayTime};
pub use variant::UiVariant;
