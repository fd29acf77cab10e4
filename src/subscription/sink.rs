// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host device-tracker interface.

use crate::tracker::PresenceReport;

/// Receives presence reports, like a host's `see` service.
///
/// The scanner calls [`see`](PresenceSink::see) once per target after
/// every tick, whether or not anything changed.
pub trait PresenceSink: Send + Sync {
    /// Records one presence report.
    fn see(&self, report: &PresenceReport);
}

impl<F> PresenceSink for F
where
    F: Fn(&PresenceReport) + Send + Sync,
{
    fn see(&self, report: &PresenceReport) {
        self(report);
    }
}

/// Sink that logs each report as structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl PresenceSink for LogSink {
    fn see(&self, report: &PresenceReport) {
        tracing::info!(
            host_name = %report.host_name,
            mac = %report.mac,
            state = %report.location_name,
            band = report.attributes.band.as_deref().unwrap_or("-"),
            ip = report.attributes.ip.as_deref().unwrap_or("-"),
            "presence"
        );
    }
}
