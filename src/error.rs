//! Error types used by the hearth runtime, services, and the bus boundary.
//!
//! This module defines three error enums:
//!
//! - [`StartupError`] — fatal errors raised before the platform reaches its
//!   running state; these abort startup and surface to the caller.
//! - [`ServiceError`] — errors raised by individual service lifecycle calls;
//!   these are logged and absorbed, never re-raised.
//! - [`BusError`] — errors raised by the message bus, including the transient
//!   transport errors the broker logger suppresses.

use std::io;
use thiserror::Error;

/// # Errors that abort startup.
///
/// Everything here happens before any service has started; the process never
/// reaches its running state and exits with the error it got.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartupError {
    /// TLS certificate or key could not be loaded from the configured paths.
    #[error("failed loading TLS certificate: {source}")]
    Tls {
        /// The underlying file or PEM parse failure.
        #[source]
        source: io::Error,
    },

    /// The message bus could not be constructed.
    #[error("failed to create message bus: {source}")]
    Bus {
        /// The underlying bus failure.
        #[source]
        source: BusError,
    },

    /// OS signal listeners could not be registered.
    #[error("failed to register signal listeners: {source}")]
    Signals {
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Configuration could not be read or deserialized.
    #[error("failed to load configuration: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: config::ConfigError,
    },
}

/// # Errors produced by service lifecycle calls.
///
/// Services are external collaborators; their failures are recoverable from
/// the platform's point of view. A start failure is logged and does not stop
/// other services from starting; a stop failure is logged and folded into the
/// final exit status.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The service failed to reach its running state.
    #[error("failed to start: {error}")]
    Start {
        /// The underlying failure message.
        error: String,
    },

    /// The service failed to release its resources.
    #[error("failed to stop: {error}")]
    Stop {
        /// The underlying failure message.
        error: String,
    },

    /// An I/O failure inside the service.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ServiceError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceError::Start { .. } => "service_start_failed",
            ServiceError::Stop { .. } => "service_stop_failed",
            ServiceError::Io(_) => "service_io",
        }
    }
}

/// # Errors produced by the message bus.
///
/// The transport variant covers the connection reset / broken pipe churn that
/// ordinary client connects and disconnects generate; the broker logger
/// checks [`BusError::is_transient`] and drops those silently.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// Network-layer error on a client connection.
    #[error("transport error: {source}")]
    Transport {
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A listener address could not be bound or parsed.
    #[error("cannot listen on {addr}: {error}")]
    Listen {
        /// The listener URL that failed.
        addr: String,
        /// The underlying failure message.
        error: String,
    },

    /// Broker-internal failure.
    #[error("broker error: {error}")]
    Broker {
        /// The underlying failure message.
        error: String,
    },

    /// The bus was closed twice, or used after close.
    #[error("bus already closed")]
    Closed,
}

impl BusError {
    /// True for network-layer errors that arise from ordinary client
    /// connect/disconnect churn. These happen all the time and are not worth
    /// logging.
    pub fn is_transient(&self) -> bool {
        match self {
            BusError::Transport { source } => matches!(
                source.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            _ => false,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::Transport { .. } => "bus_transport",
            BusError::Listen { .. } => "bus_listen",
            BusError::Broker { .. } => "bus_broker",
            BusError::Closed => "bus_closed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_transport_kinds() {
        for kind in [
            io::ErrorKind::ConnectionReset,
            io::ErrorKind::ConnectionAborted,
            io::ErrorKind::BrokenPipe,
        ] {
            let err = BusError::Transport {
                source: io::Error::new(kind, "peer went away"),
            };
            assert!(err.is_transient(), "{kind:?} should be transient");
        }
    }

    #[test]
    fn test_non_transient_errors() {
        let refused = BusError::Transport {
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert!(!refused.is_transient());

        let broker = BusError::Broker {
            error: "session table corrupt".into(),
        };
        assert!(!broker.is_transient());
        assert!(!BusError::Closed.is_transient());
    }
}
