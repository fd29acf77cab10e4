// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the parsers, the session and the tracker.
//!
//! # Types
//!
//! - [`MacAddress`] - Normalized station address (`AA-BB-CC-DD-EE-FF`)
//! - [`Band`] - Radio band a station is associated on
//! - [`StayTime`] - Connected duration, numeric or router-formatted
//! - [`PresenceState`] - `home` / `not_home` / `N/A`

mod band;
mod mac;
mod presence;
mod stay_time;

pub use band::Band;
pub use mac::MacAddress;
pub use presence::PresenceState;
pub use stay_time::StayTime;
