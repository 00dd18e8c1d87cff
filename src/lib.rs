//! # hearth
//!
//! **hearth** is the startup/shutdown supervisor for a small
//! home-automation platform built around a central publish/subscribe
//! message bus. Independent services (sensor drivers, automation rules,
//! protocol bridges) register with a [`Registry`] and are started, by
//! name, according to configuration.
//!
//! ## Architecture
//! ```text
//!   Settings (config file + HEARTH_* env)
//!       │
//!       ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Runtime (environment handle: settings + registry + sink)    │
//! │  1. arm SIGINT/SIGTERM                                       │
//! │  2. load TLS identity (fatal on failure)                     │
//! │  3. provision internal bus credentials                       │
//! │  4. construct bus via BusFactory (fatal on failure)          │
//! └──────┬──────────────────────────────────────────┬────────────┘
//!        ▼                                          ▼
//! ┌──────────────────────┐                 ┌─────────────────────┐
//! │  Supervisor          │                 │  Coordinator        │
//! │  per enabled service:│   ── signal ──► │  stop every enabled │
//! │   spawn start(cfg)   │                 │  service, close the │
//! │   observe ≤ grace    │                 │  bus, fold failures │
//! │   log the outcome    │                 │  into ExitStatus    │
//! └──────────────────────┘                 └─────────────────────┘
//! ```
//!
//! Startup is concurrent but observed sequentially: each service gets a
//! grace window (1 s by default) for its start result, and a start that
//! outruns the window is abandoned, not cancelled. Shutdown stops every
//! enabled service whether or not its start succeeded, closes the bus
//! last, and reduces all failures to a single exit status.
//!
//! ## Example
//! ```rust,no_run
//! use std::process::ExitCode;
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use hearth::{Registry, Runtime, Service, ServiceConfig, ServiceError, Settings};
//!
//! struct Lights;
//!
//! #[async_trait]
//! impl Service for Lights {
//!     async fn start(&self, config: ServiceConfig) -> Result<(), ServiceError> {
//!         let _room = config.get_str("room");
//!         Ok(())
//!     }
//!
//!     async fn stop(&self) -> Result<(), ServiceError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
//!     hearth::logging::init();
//!
//!     let settings = Settings::load(None)?;
//!     let registry = Registry::new().with("lights", Arc::new(Lights));
//!
//!     let status = Runtime::builder(settings)
//!         .with_registry(registry)
//!         .build()
//!         .run()
//!         .await?;
//!     Ok(status.into())
//! }
//! ```

mod bus;
mod config;
mod core;
mod credentials;
mod error;
pub mod logging;
mod services;
mod tls;

// ---- Public re-exports ----

pub use bus::{
    BrokerEvent, BrokerLogger, BrokerObserver, BusFactory, BusOptions, ClientHandle, LocalBus,
    Message, MessageBus, PacketKind,
};
pub use self::config::{
    MqttSettings, ServiceConfig, ServiceSettings, Settings, SupervisorSettings, TlsSettings,
    MQTT_PASS_KEY, MQTT_USER_KEY,
};
pub use self::core::{Coordinator, ExitStatus, Runtime, RuntimeBuilder, StartOutcome, Supervisor};
pub use credentials::{provision, Credentials};
pub use error::{BusError, ServiceError, StartupError};
pub use logging::{LogSink, TracingSink};
pub use services::{Registry, Service, ServiceRef};
pub use tls::{load_identity, TlsIdentity};
