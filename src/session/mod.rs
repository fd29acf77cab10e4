// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stateful router session.
//!
//! [`RouterSession`] owns the HTTP transport, the session token and what
//! was learned about the firmware. Each [`poll`](RouterSession::poll)
//! logs in when needed, fetches every station page and classifies the
//! result as a [`PollOutcome`]. Any failure tears the session down so the
//! next poll starts from variant detection again.
//!
//! # Examples
//!
//! ```no_run
//! use iptime_tracker::protocol::RouterConfig;
//! use iptime_tracker::session::{PollOutcome, RouterSession};
//!
//! # async fn example() -> iptime_tracker::Result<()> {
//! let config = RouterConfig::new("192.168.0.1").with_credentials("admin", "admin");
//! let session = RouterSession::new(config)?;
//!
//! if let PollOutcome::Stations(list) = session.poll().await {
//!     println!("{} stations", list.len());
//! }
//! session.logout().await;
//! # Ok(())
//! # }
//! ```

mod fetch;
mod login;

use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

use crate::error::{Error, LoginError};
use crate::protocol::{RouterConfig, RouterHttp};
use crate::station::StationList;
use crate::variant::UiVariant;

pub use fetch::{detect_mesh, detect_variant, fetch_stations};
pub use login::{classify_failure, extract_token};

/// Classified result of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Every page was fetched and parsed.
    Stations(StationList),
    /// A page showed the session is gone. Not an error; the next poll
    /// logs in again.
    SessionExpired,
    /// Login, transport or parsing failed.
    Failed(String),
}

impl PollOutcome {
    /// Returns the stations if the poll succeeded.
    #[must_use]
    pub fn stations(&self) -> Option<&StationList> {
        match self {
            Self::Stations(list) => Some(list),
            _ => None,
        }
    }

    /// Returns true if the poll failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// What the session currently knows about the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    /// Detected UI variant, while logged in.
    pub variant: Option<UiVariant>,
    /// Whether mesh stations are being fetched.
    pub mesh: bool,
    /// Whether a session token is held.
    pub logged_in: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    variant: Option<UiVariant>,
    mesh: bool,
}

#[derive(Debug, Default)]
struct PollCache {
    last: Option<(Instant, PollOutcome)>,
}

/// A logged-in (or logging-in) connection to one router.
pub struct RouterSession {
    http: RouterHttp,
    username: String,
    password: String,
    rssi_limit: Option<i32>,
    min_poll_interval: Duration,
    state: Mutex<SessionState>,
    poll_lock: tokio::sync::Mutex<PollCache>,
}

impl std::fmt::Debug for RouterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterSession")
            .field("url", &self.http.base_url())
            .field("username", &self.username)
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl RouterSession {
    /// Shortest time between two real polls.
    pub const DEFAULT_MIN_POLL_INTERVAL: Duration = Duration::from_secs(4);

    /// Creates a session for the router. No request is made until the
    /// first poll.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the HTTP client cannot be built.
    pub fn new(config: RouterConfig) -> Result<Self, Error> {
        let username = config.username().to_string();
        let password = config.password().to_string();
        Ok(Self {
            http: config.into_client()?,
            username,
            password,
            rssi_limit: None,
            min_poll_interval: Self::DEFAULT_MIN_POLL_INTERVAL,
            state: Mutex::new(SessionState::default()),
            poll_lock: tokio::sync::Mutex::new(PollCache::default()),
        })
    }

    /// Drops stations whose signal is weaker than `limit` dBm.
    #[must_use]
    pub fn with_rssi_limit(mut self, limit: Option<i32>) -> Self {
        self.rssi_limit = limit;
        self
    }

    /// Sets the shortest time between two real polls.
    #[must_use]
    pub fn with_min_poll_interval(mut self, interval: Duration) -> Self {
        self.min_poll_interval = interval;
        self
    }

    /// Returns the router base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Returns what the session currently knows about the router.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        SessionSnapshot {
            variant: state.variant,
            mesh: state.mesh,
            logged_in: state.token.is_some(),
        }
    }

    /// Polls the router for its station list.
    ///
    /// Concurrent callers are serialized. A call within the minimum poll
    /// interval of the previous one returns that poll's outcome without
    /// contacting the router.
    pub async fn poll(&self) -> PollOutcome {
        let mut cache = self.poll_lock.lock().await;

        if let Some((at, outcome)) = cache.last.as_ref()
            && at.elapsed() < self.min_poll_interval
        {
            tracing::trace!(url = self.base_url(), "poll throttled, reusing last outcome");
            return outcome.clone();
        }

        let outcome = self.poll_router().await;
        cache.last = Some((Instant::now(), outcome.clone()));
        outcome
    }

    async fn poll_router(&self) -> PollOutcome {
        if !self.snapshot().logged_in
            && let Err(e) = self.establish().await
        {
            return PollOutcome::Failed(e.to_string());
        }

        let (variant, token, mesh) = {
            let state = self.state.lock();
            match (state.variant, state.token.clone()) {
                (Some(variant), Some(token)) => (variant, token, state.mesh),
                _ => return PollOutcome::Failed("session was closed during login".to_string()),
            }
        };

        match fetch_stations(&self.http, variant, &token, mesh).await {
            Ok(stations) => {
                PollOutcome::Stations(StationList::from_stations(stations, self.rssi_limit))
            }
            Err(Error::Parse(e)) if e.is_session_expired() => {
                tracing::info!(url = self.base_url(), %variant, reason = %e, "session expired");
                self.logout().await;
                PollOutcome::SessionExpired
            }
            Err(e) => {
                tracing::warn!(url = self.base_url(), %variant, error = %e, "poll failed");
                self.logout().await;
                PollOutcome::Failed(e.to_string())
            }
        }
    }

    /// Detects the variant, logs in and probes for mesh.
    async fn establish(&self) -> Result<(), Error> {
        let variant = detect_variant(&self.http).await?;
        self.state.lock().variant = Some(variant);

        let token = match login::login(&self.http, variant, &self.username, &self.password).await
        {
            Ok(token) => token,
            Err(e) => {
                if matches!(e, Error::Login(LoginError::VariantMismatch)) {
                    tracing::info!(url = self.base_url(), "mobile UI unavailable, detecting again");
                }
                self.state.lock().variant = None;
                return Err(e);
            }
        };

        let mesh = detect_mesh(&self.http, variant, &token).await;

        let mut state = self.state.lock();
        state.token = Some(token);
        state.mesh = mesh;
        tracing::info!(url = self.base_url(), %variant, mesh, "session established");
        Ok(())
    }

    /// Ends the session and forgets the variant and mesh flag.
    ///
    /// The logout request is best effort; local state is cleared even if
    /// it fails.
    pub async fn logout(&self) {
        let (token, variant) = {
            let mut state = self.state.lock();
            let token = state.token.take();
            let variant = state.variant.take();
            state.mesh = false;
            (token, variant)
        };

        if let (Some(token), Some(variant)) = (token, variant) {
            tracing::debug!(url = self.base_url(), %variant, token = %login::token_hint(&token), "logging out");
            login::logout(&self.http, variant, &token).await;
        }
    }
}
