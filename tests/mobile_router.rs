// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a mock router serving the mobile UI.

use std::time::Duration;

use iptime_tracker::{
    Error, LoginError, PollOutcome, PresenceState, RouterConfig, RouterSession, Scanner,
    TrackerConfig, UiVariant,
};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "Zx9Yw8Vu7Ts6Rq5P";
const PIXEL: &str = "3C:22:FB:00:11:22";
const KINDLE: &str = "B8:27:EB:44:55:66";

async fn mount_hostinfo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login/hostinfo2.cgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("product_name=AX3000M\niux=1\niux_package_installed=1\n"),
        )
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/m_handler.cgi"))
        .and(body_string_contains("passwd=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><script>setCookie('{TOKEN}'); top.location.href='/m_login.cgi';</script></html>"
        )))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_bands(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cgi/iux_get.cgi"))
        .and(query_param("wlmode", "2g"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"stalist": []}"#))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cgi/iux_get.cgi"))
        .and(query_param("wlmode", "5g"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/mobile_stalist_5g.json")),
        )
        .mount(server)
        .await;
}

async fn mount_mesh(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cgi/iux_get.cgi"))
        .and(query_param("smenu", "info"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"product": "AX3000M", "easymesh": {"role": "controller"}}"#,
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/easymesh/api.cgi"))
        .and(query_param("key", "topology"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(include_str!("fixtures/mesh_topology.json")),
        )
        .mount(server)
        .await;
}

fn session(server: &MockServer) -> RouterSession {
    let config = RouterConfig::new(server.uri()).with_credentials("admin", "secret");
    RouterSession::new(config)
        .unwrap()
        .with_min_poll_interval(Duration::ZERO)
}

#[tokio::test]
async fn polls_mobile_station_lists() {
    let server = MockServer::start().await;
    mount_hostinfo(&server).await;
    mount_login(&server).await;
    mount_bands(&server).await;

    let session = session(&server);
    let outcome = session.poll().await;

    assert_eq!(session.snapshot().variant, Some(UiVariant::Mobile));
    assert!(!session.snapshot().mesh);

    let list = outcome.stations().expect("station list");
    assert_eq!(list.len(), 2);
    let pixel = list.get(&PIXEL.parse().unwrap()).unwrap();
    assert_eq!(pixel.stay_time.to_string(), "0d 03:15:09");
    assert_eq!(pixel.hostname.as_deref(), Some("pixel"));

    let other = list.get(&"F0:18:98:01:02:03".parse().unwrap()).unwrap();
    assert!(other.ip.is_none());
    assert!(other.hostname.is_none());
}

#[tokio::test]
async fn mesh_satellite_stations_are_reported() {
    let server = MockServer::start().await;
    mount_hostinfo(&server).await;
    mount_login(&server).await;
    mount_bands(&server).await;
    mount_mesh(&server).await;

    let config = TrackerConfig::new(server.uri(), "admin", "secret")
        .with_target("pixel", PIXEL)
        .with_target("kindle", KINDLE)
        .with_target("laptop", "00:1B:21:AA:BB:CC")
        .with_min_poll_interval(Duration::ZERO);
    let scanner = Scanner::new(config).unwrap();

    let reports = scanner.tick().await;
    assert!(scanner.snapshot().mesh);

    let pixel = &reports[0];
    assert_eq!(pixel.location_name, PresenceState::Home);
    assert_eq!(pixel.attributes.band.as_deref(), Some("5GHz"));
    assert_eq!(pixel.attributes.stay_time.as_deref(), Some("0d 03:15:09"));

    let kindle = &reports[1];
    assert_eq!(kindle.location_name, PresenceState::Home);
    assert_eq!(kindle.attributes.band.as_deref(), Some("2.4GHz"));
    assert_eq!(kindle.attributes.stay_time.as_deref(), Some("0d 02:00:00"));
    assert_eq!(kindle.attributes.signal, Some(-67));
    assert_eq!(kindle.attributes.ip.as_deref(), Some("192.168.0.44"));

    // Wired mesh entries are not Wi-Fi presence.
    let laptop = &reports[2];
    assert_eq!(laptop.location_name, PresenceState::Unavailable);
    assert_eq!(laptop.attributes.ip.as_deref(), Some("N/A"));
}

#[tokio::test]
async fn root_redirect_is_variant_mismatch() {
    let server = MockServer::start().await;
    mount_hostinfo(&server).await;
    Mock::given(method("POST"))
        .and(path("/m_handler.cgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><script> top.location = "/";</script></html>"#),
        )
        .mount(&server)
        .await;

    let session = session(&server);
    assert_eq!(
        session.poll().await,
        PollOutcome::Failed(Error::Login(LoginError::VariantMismatch).to_string())
    );
    assert!(!session.snapshot().logged_in);
}

#[tokio::test]
async fn missing_stalist_means_session_expired() {
    let server = MockServer::start().await;
    mount_hostinfo(&server).await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/cgi/iux_get.cgi"))
        .and(query_param("wlmode", "2g"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><script>parent.parent.location = "/m_login.cgi?noauto=1"; //session_timeout </script></html>"#,
        ))
        .mount(&server)
        .await;

    let session = session(&server);
    assert_eq!(session.poll().await, PollOutcome::SessionExpired);
    assert_eq!(session.snapshot().variant, None);
}
