// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure parsers for every firmware UI variant.
//!
//! Each parser turns one response body into [`StationRecord`]s and knows
//! how that variant signals an expired session, which it reports as
//! [`ParseError::SessionExpired`]. None of them perform I/O, so they are
//! tested against captured fixtures.
//!
//! - [`legacy`]: HTML station tables and the mesh radio button
//! - [`mobile`]: `stalist` JSON and the `easymesh` status section
//! - [`beta`]: JSON service calls
//! - [`mesh`]: the topology API shared by all variants
//!
//! [`StationRecord`]: crate::station::StationRecord
//! [`ParseError::SessionExpired`]: crate::error::ParseError::SessionExpired

pub mod beta;
pub mod legacy;
mod markup;
pub mod mesh;
pub mod mobile;
mod value;
