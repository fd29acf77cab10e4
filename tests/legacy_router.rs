// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a mock router serving the desktop UI.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use iptime_tracker::subscription::Subscribable;
use iptime_tracker::{
    LoginError, PollOutcome, PresenceState, RouterConfig, RouterSession, Scanner, TrackerConfig,
    TrackerEvent, UiVariant,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "Ab12Cd34Ef56Gh78";
const PHONE: &str = "0C:8E:29:11:22:33";
const STATIONS_2G: &str = include_str!("fixtures/legacy_wlan_2g.html");
const NO_STATIONS: &str = include_str!("fixtures/legacy_wlan_empty.html");
const SESSION_TIMEOUT: &str = r#"<html><script>parent.parent.location = "/sess-bin/login_session.cgi?noauto=1"; //session_timeout </script></html>"#;

async fn mount_hostinfo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login/hostinfo2.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("product_name=N604\n"))
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/sess-bin/login_handler.cgi"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("passwd=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<html><script>setCookie('{TOKEN}'); top.location.href='/sess-bin/login_session.cgi';</script></html>"
        )))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_band(server: &MockServer, bssidx: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/sess-bin/timepro.cgi"))
        .and(query_param("bssidx", bssidx))
        .and(header("cookie", format!("efm_session_id={TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves `body` for the first `times` requests to a band, ahead of any
/// other mock for it.
async fn mount_band_once(server: &MockServer, bssidx: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/sess-bin/timepro.cgi"))
        .and(query_param("bssidx", bssidx))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}

fn session(server: &MockServer) -> RouterSession {
    let config = RouterConfig::new(server.uri()).with_credentials("admin", "secret");
    RouterSession::new(config)
        .unwrap()
        .with_min_poll_interval(Duration::ZERO)
}

fn tracker_config(server: &MockServer) -> TrackerConfig {
    TrackerConfig::new(server.uri(), "admin", "secret")
        .with_target("phone", PHONE)
        .with_min_poll_interval(Duration::ZERO)
}

// ============================================================================
// RouterSession
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn polls_both_bands() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 1).await;
        mount_band(&server, "0", STATIONS_2G).await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let session = session(&server);
        let outcome = session.poll().await;

        let list = outcome.stations().expect("station list");
        assert_eq!(list.len(), 2);
        let phone = list.get(&PHONE.parse().unwrap()).unwrap();
        assert_eq!(phone.ip, Some("192.168.0.7".parse().unwrap()));
        assert_eq!(phone.hostname.as_deref(), Some("Galaxy-S23"));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.variant, Some(UiVariant::Legacy));
        assert!(snapshot.logged_in);
        assert!(!snapshot.mesh);
    }

    #[tokio::test]
    async fn unreachable_hostinfo_falls_back_to_legacy() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_band(&server, "0", STATIONS_2G).await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let session = session(&server);
        assert!(session.poll().await.stations().is_some());
        assert_eq!(session.snapshot().variant, Some(UiVariant::Legacy));
    }

    #[tokio::test]
    async fn hostinfo_without_product_falls_back_to_legacy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login/hostinfo2.cgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string("iux=1\n"))
            .mount(&server)
            .await;
        mount_login(&server, 1).await;
        mount_band(&server, "0", STATIONS_2G).await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let session = session(&server);
        assert!(session.poll().await.stations().is_some());
        assert_eq!(session.snapshot().variant, Some(UiVariant::Legacy));
    }

    #[tokio::test]
    async fn unreadable_iux_flags_fail_the_poll() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login/hostinfo2.cgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "product_name=A1004\niux=on\niux_package_installed=yes\n",
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sess-bin/login_handler.cgi"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let session = session(&server);
        let outcome = session.poll().await;

        assert_eq!(
            outcome,
            PollOutcome::Failed(
                iptime_tracker::Error::Login(LoginError::DetectionFailed(
                    "unreadable iux flags in hostinfo".to_string()
                ))
                .to_string()
            )
        );
        let snapshot = session.snapshot();
        assert!(!snapshot.logged_in);
        assert_eq!(snapshot.variant, None);
    }

    #[tokio::test]
    async fn throttled_poll_reuses_outcome() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/sess-bin/timepro.cgi"))
            .and(query_param("bssidx", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(STATIONS_2G))
            .expect(1)
            .mount(&server)
            .await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let config = RouterConfig::new(server.uri()).with_credentials("admin", "secret");
        let session = RouterSession::new(config).unwrap();

        let first = session.poll().await;
        let second = session.poll().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn bad_credentials_fail_the_poll() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        Mock::given(method("POST"))
            .and(path("/sess-bin/login_handler.cgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SESSION_TIMEOUT))
            .mount(&server)
            .await;

        let session = session(&server);
        let outcome = session.poll().await;

        assert_eq!(
            outcome,
            PollOutcome::Failed(iptime_tracker::Error::Login(LoginError::BadCredentials).to_string())
        );
        assert!(!session.snapshot().logged_in);
    }

    #[tokio::test]
    async fn expired_session_logs_in_again() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 2).await;
        mount_band_once(&server, "0", SESSION_TIMEOUT, 1).await;
        mount_band(&server, "0", STATIONS_2G).await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let session = session(&server);

        assert_eq!(session.poll().await, PollOutcome::SessionExpired);
        assert!(!session.snapshot().logged_in);
        assert_eq!(session.snapshot().variant, None);

        let outcome = session.poll().await;
        assert_eq!(outcome.stations().map(|l| l.len()), Some(2));
    }

    #[tokio::test]
    async fn server_error_logs_out() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/sess-bin/timepro.cgi"))
            .and(query_param("bssidx", "0"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sess-bin/login_session.cgi"))
            .and(query_param("logout", "1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let session = session(&server);
        assert!(session.poll().await.is_failed());
        assert!(!session.snapshot().logged_in);
    }

    #[tokio::test]
    async fn mesh_stations_are_merged() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 1).await;
        mount_band(&server, "0", STATIONS_2G).await;
        mount_band(&server, "65536", NO_STATIONS).await;
        Mock::given(method("GET"))
            .and(path("/sess-bin/timepro.cgi"))
            .and(query_param("smenu", "easymesh"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<input type="radio" id="mode_none" name="mode" value="0">
                   <input type="radio" id="mode_controller" name="mode" value="1" checked>"#,
            ))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/easymesh/api.cgi"))
            .and(query_param("key", "topology"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("fixtures/mesh_topology.json")),
            )
            .mount(&server)
            .await;

        let session = session(&server);
        let outcome = session.poll().await;

        assert!(session.snapshot().mesh);
        let list = outcome.stations().expect("station list");
        assert_eq!(list.len(), 3);
        let kindle = list.get(&"B8-27-EB-44-55-66".parse().unwrap()).unwrap();
        assert!(kindle.via_mesh);
        assert_eq!(kindle.stay_time.to_string(), "0d 02:00:00");
    }
}

// ============================================================================
// Scanner
// ============================================================================

mod scanner {
    use super::*;

    #[tokio::test]
    async fn present_target_is_home() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 1).await;
        mount_band(&server, "0", STATIONS_2G).await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let scanner = Scanner::new(tracker_config(&server)).unwrap();
        let mut events = scanner.subscribe();

        let reports = scanner.tick().await;
        assert_eq!(reports.len(), 1);

        let report = &reports[0];
        assert_eq!(report.location_name, PresenceState::Home);
        assert_eq!(report.host_name, "iptime_phone");
        assert_eq!(report.attributes.band.as_deref(), Some("2.4GHz"));
        assert_eq!(report.attributes.ip.as_deref(), Some("192.168.0.7"));
        assert_eq!(report.attributes.stay_time.as_deref(), Some("0일 04:13:02"));
        assert_eq!(report.mac, format!("{}_0C-8E-29-11-22-33", server.uri()));

        assert!(matches!(
            events.try_next().unwrap(),
            TrackerEvent::SessionEstablished {
                variant: UiVariant::Legacy,
                mesh: false,
                ..
            }
        ));
        assert!(matches!(
            events.try_next().unwrap(),
            TrackerEvent::PresenceChanged {
                to: PresenceState::Home,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn target_leaves_after_two_misses() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 1).await;
        mount_band_once(&server, "0", STATIONS_2G, 1).await;
        mount_band(&server, "0", NO_STATIONS).await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let changes = Arc::new(AtomicUsize::new(0));
        let changes_clone = changes.clone();

        let scanner = Scanner::new(tracker_config(&server)).unwrap();
        scanner.on_state_changed(move |_report, _change| {
            changes_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(scanner.tick().await[0].location_name, PresenceState::Home);

        let second = scanner.tick().await;
        assert_eq!(second[0].location_name, PresenceState::Home);
        assert_eq!(second[0].attributes.ip.as_deref(), Some("N/A"));

        assert_eq!(scanner.tick().await[0].location_name, PresenceState::NotHome);
        assert_eq!(changes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn router_unavailable_after_repeated_failures() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        Mock::given(method("POST"))
            .and(path("/sess-bin/login_handler.cgi"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SESSION_TIMEOUT))
            .mount(&server)
            .await;

        let availability = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let availability_clone = availability.clone();

        let scanner = Scanner::new(tracker_config(&server)).unwrap();
        scanner.on_availability_changed(move |available| {
            availability_clone.lock().push(available);
        });

        for _ in 0..3 {
            scanner.tick().await;
        }
        assert!(availability.lock().is_empty());

        let reports = scanner.tick().await;
        assert_eq!(*availability.lock(), vec![false]);
        assert_eq!(reports[0].location_name, PresenceState::Unavailable);
        assert!(reports[0].attributes.stay_time.is_none());
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let server = MockServer::start().await;
        mount_hostinfo(&server).await;
        mount_login(&server, 1).await;
        mount_band(&server, "0", STATIONS_2G).await;
        mount_band(&server, "65536", NO_STATIONS).await;

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        let scanner = Scanner::new(tracker_config(&server))
            .unwrap()
            .with_sink(move |_: &iptime_tracker::PresenceReport| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
            });

        scanner
            .run(tokio::time::sleep(Duration::from_millis(500)))
            .await;

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(!scanner.snapshot().logged_in);
    }
}
