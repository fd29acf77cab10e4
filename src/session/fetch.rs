// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Variant probing, mesh probing and station fetching.

use crate::error::{Error, LoginError};
use crate::parser::{beta, legacy, mesh, mobile};
use crate::protocol::RouterHttp;
use crate::protocol::endpoints::{
    BETA_SERVICE, BETA_UI, HOSTINFO, M_MESH, M_WLAN_2G, M_WLAN_5G, MESH, MESH_STATION, WLAN_2G,
    WLAN_5G,
};
use crate::station::StationRecord;
use crate::types::Band;
use crate::variant::{HostInfo, UiVariant};

/// Determines which UI the router serves.
///
/// The Beta entry page is tried first; otherwise `hostinfo2.cgi` decides
/// between the desktop and mobile UIs. An unreachable or unrecognizable
/// host info page falls back to the desktop UI, which every firmware has.
///
/// # Errors
///
/// Returns [`LoginError::DetectionFailed`] when host info mentions the
/// mobile UI flags but their values cannot be read.
pub async fn detect_variant(http: &RouterHttp) -> Result<UiVariant, LoginError> {
    match http.get(BETA_UI, None).await {
        Ok(response) if beta::is_beta_ui(response.body()) => {
            tracing::debug!(url = http.base_url(), "Beta UI detected");
            return Ok(UiVariant::Beta);
        }
        Ok(_) => {}
        Err(e) => tracing::trace!(url = http.base_url(), error = %e, "no Beta UI"),
    }

    let info = match http.get(HOSTINFO, None).await {
        Ok(response) => HostInfo::parse(response.body()),
        Err(e) => {
            tracing::error!(url = http.base_url(), error = %e, "host info page cannot be accessed");
            return Ok(UiVariant::Legacy);
        }
    };

    let Some(product) = info.product_name.as_deref() else {
        tracing::error!(url = http.base_url(), "host info page has no product name");
        return Ok(UiVariant::Legacy);
    };

    let variant = info.classify()?;
    tracing::debug!(url = http.base_url(), product, %variant, "UI variant detected");
    Ok(variant)
}

/// Reports whether mesh is enabled. Any failure counts as "no mesh".
pub async fn detect_mesh(http: &RouterHttp, variant: UiVariant, token: &str) -> bool {
    let path = match variant {
        UiVariant::Legacy => MESH,
        UiVariant::Mobile => M_MESH,
        UiVariant::Beta => MESH_STATION,
    };

    let body = match http.get(path, Some(token)).await {
        Ok(response) => response.body().to_string(),
        Err(e) => {
            tracing::debug!(url = http.base_url(), error = %e, "mesh probe failed");
            return false;
        }
    };

    let enabled = match variant {
        UiVariant::Legacy => legacy::mesh_enabled(&body),
        UiVariant::Mobile => mobile::mesh_enabled(&body),
        UiVariant::Beta => mesh::is_topology(&body),
    };
    tracing::debug!(url = http.base_url(), %variant, enabled, "mesh probe");
    enabled
}

/// Fetches every station page for the variant, mesh last.
///
/// # Errors
///
/// Returns [`Error::Protocol`] on transport failure and [`Error::Parse`]
/// when a page is malformed or shows the session has expired. The first
/// failing page stops the fetch.
pub async fn fetch_stations(
    http: &RouterHttp,
    variant: UiVariant,
    token: &str,
    mesh_enabled: bool,
) -> Result<Vec<StationRecord>, Error> {
    let mut stations = Vec::new();

    match variant {
        UiVariant::Legacy => {
            for (path, band) in [(WLAN_2G, Band::TwoPointFour), (WLAN_5G, Band::Five)] {
                let response = http.get(path, Some(token)).await?;
                stations.extend(legacy::parse_station_table(response.body(), &band)?);
            }
        }
        UiVariant::Mobile => {
            for (path, band) in [(M_WLAN_2G, Band::TwoPointFour), (M_WLAN_5G, Band::Five)] {
                let response = http.get(path, Some(token)).await?;
                stations.extend(mobile::parse_station_list(response.body(), &band)?);
            }
        }
        UiVariant::Beta => {
            let request = beta::request(beta::STATION_METHOD, serde_json::Value::Null);
            let response = http.post_json(BETA_SERVICE, &request, Some(token)).await?;
            stations.extend(beta::parse_station_list(response.body())?);
        }
    }

    if mesh_enabled {
        let response = http.get(MESH_STATION, Some(token)).await?;
        stations.extend(mesh::parse_topology(response.body())?);
    }

    tracing::trace!(url = http.base_url(), %variant, count = stations.len(), "stations fetched");
    Ok(stations)
}
