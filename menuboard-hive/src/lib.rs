//! # Menuboard Hive
//!
//! The invalidation layer.
//! Push transports publish bare signals into a [`SignalHub`]; displays
//! subscribe to a named topic and refetch whenever something arrives.
//! Signals carry no data, only "something changed".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Topic the sheet publisher announces on.
pub const SHEET_CHANNEL: &str = "sheet-channel";

/// The one event type carried on [`SHEET_CHANNEL`].
pub const SHEET_UPDATED: &str = "sheet-updated";

/// Buffered signals per topic before slow subscribers start lagging.
const TOPIC_CAPACITY: usize = 64;

/// A payload-free notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(alias = "channel")]
    pub topic: String,
    pub event: String,
}

impl Signal {
    pub fn new(topic: &str, event: &str) -> Self {
        Self {
            topic: topic.to_string(),
            event: event.to_string(),
        }
    }

    pub fn sheet_updated() -> Self {
        Self::new(SHEET_CHANNEL, SHEET_UPDATED)
    }
}

/// Named-topic fan-out. One broadcast sender per topic, created on first use.
#[derive(Default)]
pub struct SignalHub {
    topics: Mutex<HashMap<String, broadcast::Sender<Signal>>>,
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let topics: Vec<String> = self
            .topics
            .lock()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("SignalHub").field("topics", &topics).finish()
    }
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<Signal> {
        let mut topics = self.topics.lock().unwrap_or_else(|p| p.into_inner());
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .clone()
    }

    /// Start receiving signals on `topic`. Only signals published after this
    /// call are delivered.
    pub fn subscribe(&self, topic: &str) -> Subscription {
        tracing::debug!(%topic, "subscribed");
        Subscription {
            topic: topic.to_string(),
            rx: self.sender(topic).subscribe(),
        }
    }

    /// Deliver `signal` to every current subscriber of its topic.
    /// Returns how many subscribers received it.
    pub fn publish(&self, signal: Signal) -> usize {
        let delivered = self.sender(&signal.topic).send(signal.clone()).unwrap_or(0);
        tracing::debug!(topic = %signal.topic, event = %signal.event, delivered, "signal published");
        delivered
    }

    /// Drop every topic sender. Open subscriptions drain and then end.
    pub fn close(&self) {
        let mut topics = self.topics.lock().unwrap_or_else(|p| p.into_inner());
        topics.clear();
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        let topics = self.topics.lock().unwrap_or_else(|p| p.into_inner());
        topics.get(topic).map(|s| s.receiver_count()).unwrap_or(0)
    }
}

/// A live subscription to one topic. Dropping it (or calling
/// [`unsubscribe`](Subscription::unsubscribe)) cancels it.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    rx: broadcast::Receiver<Signal>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next signal. `None` once the hub has closed the topic.
    ///
    /// A subscriber that fell behind skips the signals it missed; the
    /// newer ones still queued mean the same thing.
    pub async fn recv(&mut self) -> Option<Signal> {
        loop {
            match self.rx.recv().await {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(topic = %self.topic, missed, "subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        tracing::debug!(topic = %self.topic, "unsubscribed");
    }
}

/// Fallback source for displays without a push transport: publishes
/// `sheet-updated` every `period`. The first signal fires one period after
/// start, not immediately.
pub fn spawn_ticker(hub: Arc<SignalHub>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(period_secs = period.as_secs(), "periodic revalidation started");
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            hub.publish(Signal::sheet_updated());
        }
    })
}
