// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for tracker changes.
//!
//! The [`EventBus`] uses tokio's broadcast channel so any number of
//! [`EventStream`]s can observe presence and session changes.
//!
//! # Examples
//!
//! ```
//! use iptime_tracker::event::{EventBus, TrackerEvent};
//!
//! let bus = EventBus::new();
//! let mut events = bus.subscribe();
//!
//! bus.publish(TrackerEvent::router_available("http://192.168.0.1"));
//! assert!(events.try_next().is_some());
//! ```

mod event_bus;
mod tracker_event;

pub use event_bus::{EventBus, EventStream};
pub use tracker_event::TrackerEvent;
