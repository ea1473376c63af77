//! # Notification Feed
//!
//! A bounded, newest-first list of recent events with an unread counter.
//!
//! Entries come from a [`NotificationSource`], an endless stream. The only
//! source today is [`SimulatedOrderSource`], which stands in for a real
//! order event stream: on each interval it flips a weighted coin and, on
//! success, emits an order notification for a random sample title.
//!
//! The feed keeps at most `capacity` entries (10 by default). The unread
//! counter is independent of the list: it counts every received entry,
//! including ones already pushed out, and resets when the panel is opened.

use crate::app::events::AppEvent;
use crate::core::config::NOTIFICATION_CAPACITY;
use async_channel::Sender;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Titles the simulated source picks from.
pub const SAMPLE_TITLES: [&str; 4] = [
    "The Great Gatsby",
    "1984",
    "To Kill a Mockingbird",
    "Pride and Prejudice",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Order,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message: message.into(),
            timestamp: lib_utils::now_utc(),
            kind,
        }
    }

    pub fn order_placed(title: &str) -> Self {
        Self::new(NotificationKind::Order, format!("New order placed for book: {}", title))
    }

    /// Wall-clock label shown next to the entry.
    pub fn time_label(&self) -> String {
        lib_utils::format_clock(self.timestamp)
    }
}

/// An endless, time-ordered stream of notifications.
pub trait NotificationSource: Send {
    fn subscribe(self: Box<Self>) -> BoxStream<'static, Notification>;
}

/// Random order notifications on a fixed cadence.
#[derive(Debug, Clone)]
pub struct SimulatedOrderSource {
    interval: Duration,
    probability: f64,
    seed: Option<u64>,
}

impl SimulatedOrderSource {
    pub fn new(interval: Duration, probability: f64) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            interval,
            probability,
            seed: None,
        }
    }

    /// Fixed RNG seed for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// One firing: `Some` with probability `p`.
pub(crate) fn roll<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> Option<Notification> {
    if !rng.random_bool(probability) {
        return None;
    }
    SAMPLE_TITLES.choose(rng).map(|title| Notification::order_placed(title))
}

impl NotificationSource for SimulatedOrderSource {
    fn subscribe(self: Box<Self>) -> BoxStream<'static, Notification> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // first firing one interval after subscribing
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let probability = self.probability;

        stream::unfold((ticker, rng), move |(mut ticker, mut rng)| async move {
            loop {
                ticker.tick().await;
                if let Some(notification) = roll(&mut rng, probability) {
                    return Some((notification, (ticker, rng)));
                }
            }
        })
        .boxed()
    }
}

/// Bounded newest-first notification list.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    entries: VecDeque<Notification>,
    unread: usize,
    capacity: usize,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(NOTIFICATION_CAPACITY)
    }
}

impl NotificationFeed {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            unread: 0,
            capacity,
        }
    }

    /// Prepend, dropping the oldest entry past capacity.
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        self.entries.truncate(self.capacity);
        self.unread += 1;
    }

    /// The panel was opened.
    pub fn open(&mut self) {
        self.unread = 0;
    }

    /// Dismiss one entry. The unread counter is left alone.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    /// Badge text: hidden at zero, capped at "9+".
    pub fn badge(&self) -> Option<String> {
        match self.unread {
            0 => None,
            n if n > 9 => Some("9+".to_string()),
            n => Some(n.to_string()),
        }
    }
}

/// Drain `source` into `feed` until stopped.
pub fn spawn_feed(
    source: Box<dyn NotificationSource>,
    feed: Arc<RwLock<NotificationFeed>>,
    events: Option<Sender<AppEvent>>,
) -> NotificationFeedHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let shared = Arc::clone(&feed);

    let task = tokio::spawn(async move {
        let mut stream = source.subscribe();
        tracing::info!("Notification feed started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                next = stream.next() => {
                    let Some(notification) = next else {
                        tracing::debug!("Notification source ended");
                        break;
                    };

                    tracing::debug!(id = %notification.id, kind = ?notification.kind, "Notification received");
                    shared.write().push(notification.clone());

                    if let Some(tx) = &events {
                        let _ = tx.send(AppEvent::NotificationReceived(notification)).await;
                    }
                }
            }
        }

        tracing::info!("Notification feed stopped");
    });

    NotificationFeedHandle {
        cancel,
        task: Some(task),
        feed,
    }
}

/// Owner of a running feed. Dropping it stops the source.
pub struct NotificationFeedHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    feed: Arc<RwLock<NotificationFeed>>,
}

impl NotificationFeedHandle {
    pub fn feed(&self) -> Arc<RwLock<NotificationFeed>> {
        Arc::clone(&self.feed)
    }

    pub fn snapshot(&self) -> NotificationFeed {
        self.feed.read().clone()
    }

    pub fn open(&self) {
        self.feed.write().open();
    }

    pub fn remove(&self, id: &str) -> bool {
        self.feed.write().remove(id)
    }

    pub fn clear(&self) {
        self.feed.write().clear();
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for NotificationFeedHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedSource(Vec<Notification>);

    impl NotificationSource for ScriptedSource {
        fn subscribe(self: Box<Self>) -> BoxStream<'static, Notification> {
            stream::iter(self.0).boxed()
        }
    }

    fn system(message: &str) -> Notification {
        Notification::new(NotificationKind::System, message)
    }

    #[test]
    fn test_push_is_newest_first_and_bounded() {
        let mut feed = NotificationFeed::new(10);
        for i in 0..12 {
            feed.push(system(&format!("event {}", i)));
        }

        assert_eq!(feed.len(), 10);
        assert_eq!(feed.unread(), 12);
        let messages: Vec<_> = feed.entries().map(|n| n.message.as_str()).collect();
        assert_eq!(messages.first(), Some(&"event 11"));
        assert_eq!(messages.last(), Some(&"event 2"));
    }

    #[test]
    fn test_open_resets_unread_only() {
        let mut feed = NotificationFeed::default();
        feed.push(system("a"));
        feed.push(system("b"));
        feed.open();
        assert_eq!(feed.unread(), 0);
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.badge(), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut feed = NotificationFeed::default();
        let keep = system("keep");
        let drop_me = system("drop");
        feed.push(keep.clone());
        feed.push(drop_me.clone());

        assert!(feed.remove(&drop_me.id));
        assert!(!feed.remove(&drop_me.id));
        assert_eq!(feed.entries().collect::<Vec<_>>(), vec![&keep]);
        assert_eq!(feed.unread(), 2);

        feed.clear();
        assert!(feed.is_empty());
    }

    #[test]
    fn test_badge_caps_at_nine_plus() {
        let mut feed = NotificationFeed::default();
        assert_eq!(feed.badge(), None);
        for _ in 0..9 {
            feed.push(system("x"));
        }
        assert_eq!(feed.badge().as_deref(), Some("9"));
        feed.push(system("x"));
        assert_eq!(feed.badge().as_deref(), Some("9+"));
    }

    #[test]
    fn test_order_notification_shape() {
        let n = Notification::order_placed("1984");
        assert_eq!(n.kind, NotificationKind::Order);
        assert_eq!(n.message, "New order placed for book: 1984");
        assert!(uuid::Uuid::parse_str(&n.id).is_ok());
        assert_eq!(n.time_label().len(), 8);
        assert_ne!(n.id, Notification::order_placed("1984").id);
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let n = Notification::order_placed("Dune");
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "order");
        assert!(value.get("kind").is_none());

        let back: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(back, n);
    }

    #[test]
    fn test_feed_length_is_min_of_successes_and_capacity() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut feed = NotificationFeed::default();
        let mut successes = 0;

        for _ in 0..200 {
            if let Some(n) = roll(&mut rng, 0.2) {
                assert!(SAMPLE_TITLES.iter().any(|t| n.message.ends_with(t)));
                feed.push(n);
                successes += 1;
            }
            assert_eq!(feed.len(), successes.min(10));
        }
        assert!(successes > 0);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..50).all(|_| roll(&mut rng, 0.0).is_none()));
        assert!((0..50).all(|_| roll(&mut rng, 1.0).is_some()));
    }

    #[test]
    fn test_probability_is_clamped() {
        assert_eq!(SimulatedOrderSource::new(Duration::from_secs(1), 3.0).probability(), 1.0);
        assert_eq!(SimulatedOrderSource::new(Duration::from_secs(1), f64::NAN).probability(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_fires_on_interval() {
        let source = SimulatedOrderSource::new(Duration::from_secs(10), 1.0).with_seed(42);
        let mut stream = Box::new(source).subscribe();

        let started = Instant::now();
        let first = stream.next().await.unwrap();
        assert_eq!(first.kind, NotificationKind::Order);
        assert!(started.elapsed() >= Duration::from_secs(10));

        stream.next().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_feed_fills_and_publishes() {
        let (tx, rx) = async_channel::unbounded();
        let feed = Arc::new(RwLock::new(NotificationFeed::default()));
        let source = SimulatedOrderSource::new(Duration::from_secs(10), 1.0).with_seed(3);
        let handle = spawn_feed(Box::new(source), Arc::clone(&feed), Some(tx));

        let mut received = Vec::new();
        for _ in 0..12 {
            match rx.recv().await.unwrap() {
                AppEvent::NotificationReceived(n) => received.push(n),
                other => panic!("unexpected event {:?}", other),
            }
        }

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.len(), 10);
        assert_eq!(snapshot.badge().as_deref(), Some("9+"));
        assert_eq!(snapshot.entries().next(), received.last());

        handle.open();
        assert_eq!(feed.read().unread(), 0);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_probability_never_fills() {
        let feed = Arc::new(RwLock::new(NotificationFeed::default()));
        let source = SimulatedOrderSource::new(Duration::from_secs(10), 0.0);
        let handle = spawn_feed(Box::new(source), Arc::clone(&feed), None);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert!(feed.read().is_empty());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_delivery() {
        let (tx, rx) = async_channel::unbounded();
        let feed = Arc::new(RwLock::new(NotificationFeed::default()));
        let source = SimulatedOrderSource::new(Duration::from_secs(10), 1.0);
        let handle = spawn_feed(Box::new(source), Arc::clone(&feed), Some(tx));

        rx.recv().await.unwrap();
        handle.stop();
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(feed.read().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_finite_source_drains_then_stops() {
        let feed = Arc::new(RwLock::new(NotificationFeed::new(2)));
        let source = ScriptedSource(vec![system("one"), system("two"), system("three")]);
        let handle = spawn_feed(Box::new(source), Arc::clone(&feed), None);
        while feed.read().unread() < 3 {
            tokio::task::yield_now().await;
        }
        handle.shutdown().await;

        let feed = feed.read();
        let messages: Vec<_> = feed.entries().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["three", "two"]);
        assert_eq!(feed.unread(), 3);
    }
}
