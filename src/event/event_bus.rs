// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of tracker events to any number of listeners.
//!
//! A tick publishes at most a handful of events per target, so the channel
//! is sized for a few ticks of backlog. A listener that falls further
//! behind loses the oldest events; [`EventStream`] logs the gap and keeps
//! reading instead of surfacing the lag as an error.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::TrackerEvent;

/// Events kept for a slow listener.
const BACKLOG: usize = 64;

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TrackerEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(BACKLOG)
    }

    /// Creates a bus keeping up to `capacity` unread events per listener.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns a stream of the events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Hands `event` to every listener. Events published while nobody
    /// listens are dropped.
    pub fn publish(&self, event: TrackerEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("no event listeners");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of an [`EventBus`].
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<TrackerEvent>,
}

impl EventStream {
    /// Waits for the next event.
    ///
    /// Returns `None` once every [`EventBus`] clone has been dropped.
    pub async fn next(&mut self) -> Option<TrackerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => log_lag(missed),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<TrackerEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(missed)) => log_lag(missed),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

fn log_lag(missed: u64) {
    tracing::warn!(missed, "event listener fell behind, oldest events dropped");
}
