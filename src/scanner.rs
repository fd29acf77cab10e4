// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling loop tying the router session to the tracked targets.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::config::TrackerConfig;
use crate::error::Error;
use crate::event::{EventBus, EventStream, TrackerEvent};
use crate::session::{PollOutcome, RouterSession, SessionSnapshot};
use crate::subscription::{CallbackRegistry, PresenceSink, Subscribable, SubscriptionId};
use crate::tracker::{PresenceChange, PresenceReport, TrackedTarget, device_id};

struct TickState {
    targets: Vec<TrackedTarget>,
    failed_ticks: u32,
    available: bool,
}

/// Tracks configured devices on one router.
///
/// Every [`tick`](Self::tick) polls the router once, feeds the outcome to
/// each target and hands one [`PresenceReport`] per target to the sink and
/// the registered callbacks. Changes are also published on the event bus.
///
/// # Examples
///
/// ```no_run
/// use iptime_tracker::{Scanner, TrackerConfig};
///
/// # async fn example() -> iptime_tracker::Result<()> {
/// let config = TrackerConfig::new("192.168.0.1", "admin", "secret")
///     .with_target("phone", "AA:BB:CC:00:11:22");
///
/// let scanner = Scanner::new(config)?.with_sink(|report: &iptime_tracker::PresenceReport| {
///     println!("{} is {}", report.host_name, report.location_name);
/// });
///
/// scanner.run(async { tokio::signal::ctrl_c().await.ok(); }).await;
/// # Ok(())
/// # }
/// ```
pub struct Scanner {
    session: RouterSession,
    scan_interval: Duration,
    error_threshold: u32,
    state: Mutex<TickState>,
    callbacks: CallbackRegistry,
    event_bus: EventBus,
    sink: Option<Arc<dyn PresenceSink>>,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("session", &self.session)
            .field("scan_interval", &self.scan_interval)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    /// Creates a scanner from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid and
    /// [`Error::Protocol`] if the HTTP client cannot be built.
    pub fn new(config: TrackerConfig) -> Result<Self, Error> {
        config.validate()?;

        let session = RouterSession::new(config.router_config())?
            .with_rssi_limit(config.rssi_limit)
            .with_min_poll_interval(config.min_poll_interval());

        Ok(Self {
            session,
            scan_interval: config.scan_interval(),
            error_threshold: config.error_threshold,
            state: Mutex::new(TickState {
                targets: config.tracked_targets()?,
                failed_ticks: 0,
                available: true,
            }),
            callbacks: CallbackRegistry::new(),
            event_bus: EventBus::new(),
            sink: None,
        })
    }

    /// Sets the sink that receives every report.
    #[must_use]
    pub fn with_sink(mut self, sink: impl PresenceSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Returns the router base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.session.base_url()
    }

    /// Returns the tick interval.
    #[must_use]
    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    /// Returns what the session currently knows about the router.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Subscribes to tracker events.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        self.event_bus.subscribe()
    }

    /// Returns the current report for every target without polling.
    pub async fn reports(&self) -> Vec<PresenceReport> {
        let state = self.state.lock().await;
        state
            .targets
            .iter()
            .map(|target| PresenceReport::new(self.base_url(), target))
            .collect()
    }

    /// Polls the router once and reports every target.
    ///
    /// Returns the reports in configuration order.
    pub async fn tick(&self) -> Vec<PresenceReport> {
        let mut state = self.state.lock().await;

        let before = self.session.snapshot();
        let outcome = self.session.poll().await;
        let after = self.session.snapshot();

        self.publish_session_change(before, after, &outcome);
        self.update_availability(&mut state, &outcome);

        let url = self.base_url();
        let mut reports = Vec::with_capacity(state.targets.len());
        for target in &mut state.targets {
            let change = target.apply(&outcome);
            let report = PresenceReport::new(url, target);
            self.deliver(&report, target, change);
            reports.push(report);
        }

        tracing::debug!(
            url,
            outcome = outcome_label(&outcome),
            targets = reports.len(),
            "tick complete"
        );
        reports
    }

    /// Ticks now and then every scan interval until `shutdown` resolves,
    /// then logs out.
    ///
    /// A tick that overruns the interval delays the next one rather than
    /// causing a burst.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            url = self.base_url(),
            interval_secs = self.scan_interval.as_secs(),
            "scanner started"
        );

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        self.close().await;
        tracing::info!(url = self.base_url(), "scanner stopped");
    }

    /// Ends the router session.
    pub async fn close(&self) {
        self.session.logout().await;
    }

    fn deliver(&self, report: &PresenceReport, target: &TrackedTarget, change: Option<PresenceChange>) {
        if let Some(sink) = &self.sink {
            sink.see(report);
        }
        self.callbacks.dispatch(report, change);

        if let Some(change) = change {
            tracing::info!(
                name = target.name(),
                mac = %target.mac(),
                from = %change.from,
                to = %change.to,
                "presence changed"
            );
            self.event_bus.publish(TrackerEvent::presence_changed(
                device_id(self.base_url(), &target.mac().to_string()),
                target.name(),
                change.from,
                change.to,
            ));
        }
    }

    fn publish_session_change(
        &self,
        before: SessionSnapshot,
        after: SessionSnapshot,
        outcome: &PollOutcome,
    ) {
        let url = self.base_url().to_string();
        match (before.logged_in, after.logged_in, after.variant) {
            (false, true, Some(variant)) => self.event_bus.publish(TrackerEvent::SessionEstablished {
                url,
                variant,
                mesh: after.mesh,
            }),
            (true, false, _) => self.event_bus.publish(TrackerEvent::SessionLost {
                url,
                reason: match outcome {
                    PollOutcome::Failed(reason) => reason.clone(),
                    _ => "session expired".to_string(),
                },
            }),
            _ => {}
        }
    }

    /// Tracks consecutive failed ticks. The router is reported unavailable
    /// on the same tick the targets would turn `N/A`.
    fn update_availability(&self, state: &mut TickState, outcome: &PollOutcome) {
        match outcome {
            PollOutcome::Stations(_) => {
                state.failed_ticks = 0;
                if !state.available {
                    state.available = true;
                    tracing::info!(url = self.base_url(), "router available again");
                    self.callbacks.dispatch_availability(true);
                    self.event_bus
                        .publish(TrackerEvent::router_available(self.base_url()));
                }
            }
            PollOutcome::SessionExpired => {}
            PollOutcome::Failed(reason) => {
                state.failed_ticks = state.failed_ticks.saturating_add(1);
                if state.available && state.failed_ticks > self.error_threshold {
                    state.available = false;
                    tracing::warn!(
                        url = self.base_url(),
                        failed_ticks = state.failed_ticks,
                        %reason,
                        "router unavailable"
                    );
                    self.callbacks.dispatch_availability(false);
                    self.event_bus
                        .publish(TrackerEvent::router_unavailable(self.base_url(), reason.clone()));
                }
            }
        }
    }
}

fn outcome_label(outcome: &PollOutcome) -> &'static str {
    match outcome {
        PollOutcome::Stations(_) => "stations",
        PollOutcome::SessionExpired => "session_expired",
        PollOutcome::Failed(_) => "failed",
    }
}

impl Subscribable for Scanner {
    fn on_presence<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport) + Send + Sync + 'static,
    {
        self.callbacks.on_presence(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&PresenceReport, PresenceChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn on_availability_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.callbacks.on_availability_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}
