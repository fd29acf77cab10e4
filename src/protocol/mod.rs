// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP plumbing for talking to an ipTIME router.
//!
//! - [`RouterConfig`]: base URL, account and timeout
//! - [`RouterHttp`]: request helpers that attach the session cookie
//! - [`endpoints`]: the fixed firmware paths for every UI variant

pub mod endpoints;
mod http;

pub use http::{RouterConfig, RouterHttp, RouterResponse};
