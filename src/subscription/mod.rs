// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delivery of presence reports to the host.
//!
//! Reports reach the host in two ways:
//!
//! - a [`PresenceSink`], the host's device tracker, called for every
//!   report
//! - callbacks registered through [`Subscribable`] and kept in a
//!   [`CallbackRegistry`], for code that only cares about changes
//!
//! ```no_run
//! use iptime_tracker::{Scanner, TrackerConfig};
//! use iptime_tracker::subscription::Subscribable;
//!
//! # fn example(config: TrackerConfig) -> iptime_tracker::Result<()> {
//! let scanner = Scanner::new(config)?;
//! scanner.on_availability_changed(|available| {
//!     println!("router available: {available}");
//! });
//! # Ok(())
//! # }
//! ```

mod callback;
mod sink;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use sink::{LogSink, PresenceSink};
pub use subscribable::Subscribable;
