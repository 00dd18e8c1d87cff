//! # Service lifecycle contract.
//!
//! A service is an independently startable unit of platform functionality
//! (a sensor driver, an automation rule, a protocol bridge), looked up from
//! the [`Registry`](crate::Registry) by its configuration key.
//!
//! ## Contract obligations
//! - `start` is invoked at most once per process run, from a spawned task
//!   (never the main flow); it must be safe off the main execution context.
//! - `stop` is invoked at most once, for every enabled service, **regardless
//!   of whether `start` succeeded, failed, or timed out**. Implementations
//!   must be idempotent and safe to call on a never-started or
//!   partially-started service.
//! - A `start` that outlives its observation window is abandoned, not
//!   cancelled; it may still complete in the background. Services that care
//!   should make `start` fast and defer slow work to their own tasks.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::logging::LogSink;

/// Shared handle to a service. The registry owns the service; the supervisor
/// holds a handle only for the duration of one start or stop call.
pub type ServiceRef = Arc<dyn Service>;

/// # Startable, stoppable unit of platform functionality.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Brings the service up with its scoped configuration.
    ///
    /// Runs on a spawned task; a slow implementation delays nobody but
    /// itself past the supervisor's grace window.
    async fn start(&self, config: ServiceConfig) -> Result<(), ServiceError>;

    /// Tears the service down.
    ///
    /// Must be idempotent and must tolerate `start` never having run or
    /// never having completed.
    async fn stop(&self) -> Result<(), ServiceError>;

    /// Attaches the shared log sink before `start` is called.
    ///
    /// The default implementation discards the sink; services that produce
    /// output should keep it.
    fn use_logger(&self, sink: Arc<dyn LogSink>) {
        let _ = sink;
    }
}
