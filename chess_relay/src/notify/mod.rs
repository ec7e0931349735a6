//! Change-signal fan-out.
//!
//! Publishes a lightweight "state changed" signal per game identifier.
//! Signals carry no payload: subscribers always re-derive truth by pulling
//! canonical state from the store, so a missed or coalesced signal only
//! delays a pull and never produces stale data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

/// Capacity of each per-game signal channel. Slow subscribers that overflow
/// it observe a `Lagged` error, which they treat as one coalesced signal.
const SIGNAL_BUFFER: usize = 16;

/// Signal broadcast to viewers when a game's state changes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal {
    StateChanged,
}

/// Per-game broadcast topics. Cheap to clone; all clones share one topic
/// registry.
#[derive(Clone, Debug, Default)]
pub struct ChangeNotifier {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<Signal>>>>,
}

impl ChangeNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to change signals for a game, creating the topic on first
    /// use.
    pub fn subscribe(&self, game_id: &str) -> broadcast::Receiver<Signal> {
        let mut topics = self.topics.lock().expect("notifier registry poisoned");
        topics
            .entry(game_id.to_string())
            .or_insert_with(|| broadcast::channel(SIGNAL_BUFFER).0)
            .subscribe()
    }

    /// Broadcast a change signal to all current subscribers of a game.
    /// Returns the number of subscribers the signal reached. Delivery is
    /// best-effort: with no subscribers the signal is dropped and the topic
    /// reclaimed.
    pub fn publish(&self, game_id: &str) -> usize {
        let mut topics = self.topics.lock().expect("notifier registry poisoned");
        match topics.get(game_id) {
            Some(sender) => match sender.send(Signal::StateChanged) {
                Ok(delivered) => delivered,
                Err(_) => {
                    topics.remove(game_id);
                    0
                }
            },
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let notifier = ChangeNotifier::new();
        let mut first = notifier.subscribe("g");
        let mut second = notifier.subscribe("g");

        assert_eq!(notifier.publish("g"), 2);
        assert_eq!(first.recv().await.unwrap(), Signal::StateChanged);
        assert_eq!(second.recv().await.unwrap(), Signal::StateChanged);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let notifier = ChangeNotifier::new();
        assert_eq!(notifier.publish("nobody"), 0);

        let sub = notifier.subscribe("g");
        drop(sub);
        assert_eq!(notifier.publish("g"), 0);
    }

    #[tokio::test]
    async fn test_topics_are_isolated_per_game() {
        let notifier = ChangeNotifier::new();
        let mut a = notifier.subscribe("a");
        let _b = notifier.subscribe("b");

        assert_eq!(notifier.publish("a"), 1);
        assert_eq!(a.recv().await.unwrap(), Signal::StateChanged);
        assert!(a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_overflow_surfaces_as_lagged() {
        let notifier = ChangeNotifier::new();
        let mut sub = notifier.subscribe("g");
        for _ in 0..SIGNAL_BUFFER + 4 {
            notifier.publish("g");
        }
        // The receiver lags rather than blocking the publisher; the viewer
        // treats this as one coalesced signal and pulls current truth.
        assert!(matches!(
            sub.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(_))
        ));
    }
}
