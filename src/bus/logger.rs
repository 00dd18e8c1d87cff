//! # Broker event adapter: bus errors into the application log.
//!
//! The broker reports every protocol event through its observer callback.
//! Almost all of it is noise from the platform's point of view; the one
//! thing worth surfacing is an unexpected error.
//!
//! ## Rules
//! - Transient transport errors (connection reset / broken pipe churn from
//!   clients coming and going) are swallowed silently.
//! - Every other error is logged twice: a human line on the sink, and the
//!   raw error detail at debug level for diagnosis.
//! - Event and packet kinds produce no output and never fail; unknown kinds
//!   are no-ops.

use std::sync::Arc;

use crate::error::BusError;
use crate::logging::LogSink;

use super::events::{BrokerEvent, BrokerObserver, ClientHandle, Message, PacketKind};

/// Translates broker observer callbacks into the application log sink.
pub struct BrokerLogger {
    sink: Arc<dyn LogSink>,
}

impl BrokerLogger {
    /// Creates an adapter writing to the given sink.
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Observer entry point, signature-compatible with the bus callback.
    pub fn observe(
        &self,
        event: BrokerEvent,
        client: Option<&ClientHandle>,
        packet: Option<PacketKind>,
        message: Option<&Message>,
        error: Option<&BusError>,
    ) {
        if let Some(err) = error {
            // Transient churn from clients coming and going stays out of the log.
            if !err.is_transient() {
                self.sink.log("new error encountered:");
                self.sink.log(&err.to_string());
                tracing::debug!(label = err.as_label(), error = ?err, "broker error detail");
            }
        }

        tracing::trace!(?event, ?client, ?packet, message = ?message.map(|m| &m.topic), "broker event");
    }

    /// Wraps the adapter into the callback type [`BusOptions`] carries.
    ///
    /// [`BusOptions`]: super::BusOptions
    pub fn into_observer(self) -> BrokerObserver {
        Arc::new(move |event, client, packet, message, error| {
            self.observe(event, client, packet, message, error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    struct CapturedSink(Mutex<Vec<String>>);

    impl LogSink for CapturedSink {
        fn log(&self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    fn logger() -> (BrokerLogger, Arc<CapturedSink>) {
        let sink = Arc::new(CapturedSink(Mutex::new(Vec::new())));
        (BrokerLogger::new(sink.clone()), sink)
    }

    #[test]
    fn test_transient_errors_are_suppressed() {
        let (logger, sink) = logger();
        let err = BusError::Transport {
            source: io::Error::new(io::ErrorKind::ConnectionReset, "client went away"),
        };
        logger.observe(BrokerEvent::LostConnection, None, None, None, Some(&err));
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_other_errors_reach_the_sink() {
        let (logger, sink) = logger();
        let err = BusError::Broker {
            error: "session table corrupt".into(),
        };
        logger.observe(BrokerEvent::SessionError, None, None, None, Some(&err));

        let lines = sink.0.lock().unwrap();
        assert_eq!(lines.len(), 2, "human line plus error detail");
        assert_eq!(lines[0], "new error encountered:");
        assert!(lines[1].contains("session table corrupt"));
    }

    #[test]
    fn test_all_event_and_packet_kinds_are_accepted() {
        let (logger, sink) = logger();
        let client = ClientHandle {
            client_id: "sensor-7".into(),
        };
        let message = Message::new("home/kitchen/temp", b"21.5".to_vec());

        for event in [
            BrokerEvent::NewConnection,
            BrokerEvent::PacketReceived,
            BrokerEvent::MessagePublished,
            BrokerEvent::MessageForwarded,
            BrokerEvent::PacketSent,
            BrokerEvent::LostConnection,
            BrokerEvent::TransportError,
            BrokerEvent::SessionError,
            BrokerEvent::BackendError,
            BrokerEvent::ClientError,
        ] {
            logger.observe(event, Some(&client), None, Some(&message), None);
        }
        for packet in [
            PacketKind::Connect,
            PacketKind::ConnAck,
            PacketKind::Publish,
            PacketKind::PubAck,
            PacketKind::PubRec,
            PacketKind::PubRel,
            PacketKind::PubComp,
            PacketKind::Subscribe,
            PacketKind::SubAck,
            PacketKind::Unsubscribe,
            PacketKind::UnsubAck,
            PacketKind::PingReq,
            PacketKind::PingResp,
            PacketKind::Disconnect,
        ] {
            logger.observe(BrokerEvent::PacketReceived, Some(&client), Some(packet), None, None);
        }

        assert!(
            sink.0.lock().unwrap().is_empty(),
            "event/packet kinds alone never produce sink output"
        );
    }
}
