//! # Message bus boundary.
//!
//! The broker implementation is external to this crate; hearth consumes it
//! through two types: [`MessageBus`], the handle it keeps for the life of
//! the process, and [`BusFactory`], the constructor it calls once at
//! startup with the assembled [`BusOptions`](super::BusOptions).
//!
//! The only operation the platform ever needs from a running bus is
//! `close`; everything else (topic routing, wire protocol, connection
//! handling) stays behind the factory.

use async_trait::async_trait;

use crate::error::BusError;

use super::options::BusOptions;

/// Handle to a running message bus.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Shuts the bus down, releasing its listeners.
    ///
    /// Called exactly once, after every service has been stopped. An error
    /// here folds into the process exit status but aborts nothing.
    async fn close(&self) -> Result<(), BusError>;
}

/// One-shot constructor for the message bus.
///
/// Invoked after credential provisioning, so `options.users` already
/// contains the internal entry. A construction failure is fatal at startup.
pub type BusFactory =
    Box<dyn FnOnce(BusOptions) -> Result<Box<dyn MessageBus>, BusError> + Send>;
