// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed router paths, relative to the router base URL.

/// Host information page, readable without a session.
pub const HOSTINFO: &str = "/login/hostinfo2.cgi";

/// Legacy PC UI login handler.
pub const LOGIN: &str = "/sess-bin/login_handler.cgi";
/// Legacy PC UI logout.
pub const LOGOUT: &str = "/sess-bin/login_session.cgi?logout=1";
/// Legacy PC UI station table for the 2.4 GHz radio.
pub const WLAN_2G: &str =
    "/sess-bin/timepro.cgi?tmenu=iframe&smenu=macauth_pcinfo_status&bssidx=0";
/// Legacy PC UI station table for the 5 GHz radio.
pub const WLAN_5G: &str =
    "/sess-bin/timepro.cgi?tmenu=iframe&smenu=macauth_pcinfo_status&bssidx=65536";
/// Legacy PC UI mesh configuration page.
pub const MESH: &str = "/sess-bin/timepro.cgi?tmenu=wirelessconf&smenu=easymesh";

/// Mobile UI login handler.
pub const M_LOGIN: &str = "/m_handler.cgi";
/// Mobile UI logout.
pub const M_LOGOUT: &str = "/m_login.cgi?logout=1";
/// Mobile UI station list for the 2.4 GHz radio.
pub const M_WLAN_2G: &str =
    "/cgi/iux_get.cgi?tmenu=wirelessconf&smenu=macauth&act=status&wlmode=2g&bssidx=0";
/// Mobile UI station list for the 5 GHz radio.
pub const M_WLAN_5G: &str =
    "/cgi/iux_get.cgi?tmenu=wirelessconf&smenu=macauth&act=status&wlmode=5g&bssidx=65536";
/// Mobile UI system status, which carries the mesh section when enabled.
pub const M_MESH: &str = "/cgi/iux_get.cgi?tmenu=sysconf&smenu=info&act=status";

/// Mesh topology API, shared by every UI variant.
pub const MESH_STATION: &str = "/easymesh/api.cgi?key=topology";

/// Entry page of the Beta UI.
pub const BETA_UI: &str = "/ui/";
/// JSON service endpoint of the Beta UI.
pub const BETA_SERVICE: &str = "/cgi/service.cgi";

/// Name of the session cookie every UI variant uses.
pub const SESSION_COOKIE: &str = "efm_session_id";
