//! # In-process message bus.
//!
//! [`LocalBus`] is a broadcast-channel bus for single-process deployments,
//! demos, and tests. It does no networking and speaks no wire protocol; it
//! exists so the rest of the platform can be exercised against a real
//! [`MessageBus`](super::MessageBus) without an external broker.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish` never blocks; subscribers that lag
//!   skip the oldest messages.
//! - **No persistence**: messages are dropped when nobody is subscribed.
//! - TLS, user, and listener options are accepted and ignored — there is no
//!   network to authenticate or bind.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::BusError;

use super::events::{BrokerEvent, BrokerObserver, Message};
use super::message_bus::MessageBus;
use super::options::BusOptions;

const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast-channel bus for in-process pub/sub.
pub struct LocalBus {
    tx: broadcast::Sender<Message>,
    observer: Option<BrokerObserver>,
    closed: AtomicBool,
}

impl LocalBus {
    /// Creates a bus with the given ring-buffer capacity (clamped to 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            observer: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Factory entry point matching [`BusFactory`](super::BusFactory).
    ///
    /// The TLS identity, user map, and listeners in `options` are ignored;
    /// the observer is kept and notified on publishes.
    pub fn open(options: BusOptions) -> Result<Box<dyn MessageBus>, BusError> {
        let mut bus = LocalBus::new(DEFAULT_CAPACITY);
        bus.observer = options.observer;
        Ok(Box::new(bus))
    }

    /// Publishes a message to all current subscribers.
    pub fn publish(&self, message: Message) -> Result<(), BusError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BusError::Closed);
        }
        if let Some(observer) = &self.observer {
            observer(
                BrokerEvent::MessagePublished,
                None,
                None,
                Some(&message),
                None,
            );
        }
        let _ = self.tx.send(message);
        Ok(())
    }

    /// Creates a receiver observing subsequent messages.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl MessageBus for LocalBus {
    async fn close(&self) -> Result<(), BusError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(BusError::Closed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let bus = LocalBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(Message::new("home/hall/motion", b"on".to_vec()))
            .expect("publish");
        let got = rx.recv().await.expect("message");
        assert_eq!(got.topic, "home/hall/motion");
        assert_eq!(got.payload, b"on");
    }

    #[tokio::test]
    async fn test_close_is_single_shot() {
        let bus = LocalBus::new(16);
        bus.close().await.expect("first close");
        let err = bus.close().await.expect_err("second close");
        assert!(matches!(err, BusError::Closed));
    }

    #[tokio::test]
    async fn test_publish_after_close_fails() {
        let bus = LocalBus::new(16);
        bus.close().await.expect("close");
        let err = bus
            .publish(Message::new("home/hall/motion", Vec::new()))
            .expect_err("closed bus");
        assert!(matches!(err, BusError::Closed));
    }

    #[tokio::test]
    async fn test_observer_sees_publishes() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let options = BusOptions::new().with_observer(Arc::new(
            move |event, _client, _packet, _message, _error| {
                if event == BrokerEvent::MessagePublished {
                    seen.fetch_add(1, Ordering::Relaxed);
                }
            },
        ));

        let mut bus = LocalBus::new(16);
        bus.observer = options.observer;
        bus.publish(Message::new("home/kitchen/temp", b"21.5".to_vec()))
            .expect("publish");
        bus.publish(Message::new("home/kitchen/temp", b"21.6".to_vec()))
            .expect("publish");
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }
}
