// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uniform station records built from every firmware variant.
//!
//! A [`StationList`] is rebuilt from scratch on every successful poll;
//! records are never merged across polls.

use std::collections::HashMap;
use std::net::IpAddr;

use serde::Serialize;

use crate::types::{Band, MacAddress, StayTime};

/// One station associated with the router or one of its mesh satellites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecord {
    /// Normalized station address.
    pub mac: MacAddress,
    /// IP address, when the router knows it.
    pub ip: Option<IpAddr>,
    /// Radio band the station is on.
    pub band: Band,
    /// How long the station has been connected.
    pub stay_time: StayTime,
    /// Host name reported by the router.
    pub hostname: Option<String>,
    /// Received signal strength in dBm.
    pub signal: Option<i32>,
    /// Bytes sent to the station.
    pub tx_bytes: Option<u64>,
    /// Bytes received from the station.
    pub rx_bytes: Option<u64>,
    /// Whether the station was reported by the mesh topology.
    pub via_mesh: bool,
}

impl StationRecord {
    /// Creates a record with the fields every variant reports.
    #[must_use]
    pub fn new(mac: MacAddress, band: Band, stay_time: StayTime) -> Self {
        Self {
            mac,
            ip: None,
            band,
            stay_time,
            hostname: None,
            signal: None,
            tx_bytes: None,
            rx_bytes: None,
            via_mesh: false,
        }
    }

    /// Sets the IP address from router text, ignoring unparsable values.
    #[must_use]
    pub fn with_ip_text(mut self, ip: Option<&str>) -> Self {
        self.ip = ip.and_then(|s| s.trim().parse().ok());
        self
    }

    /// Sets the host name, ignoring blank values.
    #[must_use]
    pub fn with_hostname(mut self, hostname: Option<&str>) -> Self {
        self.hostname = hostname
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        self
    }

    /// Sets the signal strength.
    #[must_use]
    pub fn with_signal(mut self, signal: Option<i32>) -> Self {
        self.signal = signal;
        self
    }

    /// Sets the throughput counters.
    #[must_use]
    pub fn with_traffic(mut self, tx_bytes: Option<u64>, rx_bytes: Option<u64>) -> Self {
        self.tx_bytes = tx_bytes;
        self.rx_bytes = rx_bytes;
        self
    }

    /// Marks the record as coming from the mesh topology.
    #[must_use]
    pub fn from_mesh(mut self) -> Self {
        self.via_mesh = true;
        self
    }
}

/// All stations seen in one poll, keyed by MAC address.
///
/// # Examples
///
/// ```
/// use iptime_tracker::station::{StationList, StationRecord};
/// use iptime_tracker::types::{Band, StayTime};
///
/// let near = StationRecord::new("AA-BB-CC-00-00-01".parse().unwrap(), Band::Five, StayTime::from_secs(10))
///     .with_signal(Some(-60));
/// let far = StationRecord::new("AA-BB-CC-00-00-02".parse().unwrap(), Band::Five, StayTime::from_secs(10))
///     .with_signal(Some(-90));
///
/// let list = StationList::from_stations([near, far], Some(-81));
/// assert_eq!(list.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationList {
    stations: HashMap<MacAddress, StationRecord>,
}

impl StationList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from stations in fetch order.
    ///
    /// Later records replace earlier ones for the same MAC, so mesh
    /// entries, fetched last, win. Stations with a known signal weaker than
    /// `rssi_limit` are dropped.
    #[must_use]
    pub fn from_stations(
        stations: impl IntoIterator<Item = StationRecord>,
        rssi_limit: Option<i32>,
    ) -> Self {
        let mut list = Self::new();
        for station in stations {
            if let (Some(limit), Some(signal)) = (rssi_limit, station.signal)
                && signal < limit
            {
                tracing::trace!(mac = %station.mac, signal, limit, "dropping weak station");
                continue;
            }
            list.insert(station);
        }
        list
    }

    /// Inserts a record, replacing any previous one for the same MAC.
    pub fn insert(&mut self, station: StationRecord) {
        self.stations.insert(station.mac, station);
    }

    /// Returns the record for a MAC address.
    #[must_use]
    pub fn get(&self, mac: &MacAddress) -> Option<&StationRecord> {
        self.stations.get(mac)
    }

    /// Returns true if the MAC address was seen.
    #[must_use]
    pub fn contains(&self, mac: &MacAddress) -> bool {
        self.stations.contains_key(mac)
    }

    /// Returns the number of stations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if no station was seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Iterates over the records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &StationRecord> {
        self.stations.values()
    }
}
