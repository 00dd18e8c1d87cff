//! # Log sink shared between the runtime and its services.
//!
//! The platform hands every service one append-only sink at startup via
//! [`Service::use_logger`](crate::Service::use_logger), so service output
//! lands in the same place as the runtime's own log lines.
//!
//! [`TracingSink`] is the default implementation; it forwards lines to the
//! `tracing` ecosystem, which [`init`] wires to an env-filtered stdout
//! subscriber.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Append-only line sink.
///
/// Implementations must be cheap to call and must not block; a sink sits on
/// every service's logging path.
pub trait LogSink: Send + Sync + 'static {
    /// Appends one line to the sink.
    fn log(&self, line: &str);
}

/// Default sink backed by the `tracing` ecosystem.
///
/// Lines are emitted at `INFO` level under the `hearth::service` target so
/// operators can filter service chatter separately from the runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    /// Returns the sink as a shared trait object.
    pub fn shared() -> Arc<dyn LogSink> {
        Arc::new(TracingSink)
    }
}

impl LogSink for TracingSink {
    fn log(&self, line: &str) {
        tracing::info!(target: "hearth::service", "{line}");
    }
}

/// Installs the global tracing subscriber: `RUST_LOG`-filtered, formatted to
/// stdout.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
