// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-target presence tracking.
//!
//! A [`TrackedTarget`] turns the stream of [`PollOutcome`]s into a
//! debounced [`PresenceState`]; a [`PresenceReport`] is what the host's
//! device tracker receives for it after every poll.
//!
//! [`PollOutcome`]: crate::session::PollOutcome
//! [`PresenceState`]: crate::types::PresenceState

mod report;
mod target;

pub use report::{PresenceAttributes, PresenceReport, SOURCE_TYPE, UNKNOWN, device_id, slugify};
pub use target::{PresenceChange, Sighting, Thresholds, TrackedTarget};
