//! # Broker lifecycle events and wire-level vocabulary.
//!
//! These types form the observer boundary between hearth and whatever broker
//! backs the bus. The broker reports everything it does through one callback
//! (see [`BrokerObserver`]); hearth is free to ignore most of it.
//!
//! Both enums are `#[non_exhaustive]`: a broker may grow new event or packet
//! kinds, and observers must treat anything they do not recognize as a
//! no-op, never a failure.

use std::sync::Arc;

use crate::error::BusError;

/// Broker lifecycle event classification.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrokerEvent {
    /// A client connected.
    NewConnection,
    /// A packet arrived from a client.
    PacketReceived,
    /// A message was accepted for delivery.
    MessagePublished,
    /// A message was forwarded to a subscriber.
    MessageForwarded,
    /// A packet was written to a client.
    PacketSent,
    /// A client connection went away.
    LostConnection,
    /// Transport-layer failure.
    TransportError,
    /// Session-state failure.
    SessionError,
    /// Backend/storage failure.
    BackendError,
    /// Client protocol violation.
    ClientError,
}

/// MQTT control packet kinds, as reported alongside packet events.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketKind {
    Connect,
    ConnAck,
    Publish,
    PubAck,
    PubRec,
    PubRel,
    PubComp,
    Subscribe,
    SubAck,
    Unsubscribe,
    UnsubAck,
    PingReq,
    PingResp,
    Disconnect,
}

/// Opaque handle identifying the client a broker event refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientHandle {
    /// Broker-assigned client identifier.
    pub client_id: String,
}

/// One message on the bus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Topic the message was published under.
    pub topic: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
    /// Whether the broker should retain the message for late subscribers.
    pub retain: bool,
}

impl Message {
    /// Convenience constructor for a non-retained message.
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            retain: false,
        }
    }
}

/// Fire-and-forget observer the bus invokes on every protocol event.
///
/// Never on the critical path of message delivery; implementations must not
/// block and must not panic.
pub type BrokerObserver = Arc<
    dyn Fn(BrokerEvent, Option<&ClientHandle>, Option<PacketKind>, Option<&Message>, Option<&BusError>)
        + Send
        + Sync,
>;
