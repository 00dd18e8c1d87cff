//! # Runtime: one process lifetime, end to end.
//!
//! [`Runtime`] is the explicit environment handle the supervisor and the
//! coordinator share: settings, service registry, log sink, and the bus
//! factory. Built once at process start, consumed by [`Runtime::run`].
//!
//! ## Lifecycle
//! ```text
//! Runtime::run()
//!   ├─► arm SIGINT/SIGTERM listeners        (buffered from here on)
//!   ├─► load TLS identity (if enabled)      ── failure is fatal
//!   ├─► provision internal credentials      (mutates the user-map copy)
//!   ├─► build BusOptions, construct bus     ── failure is fatal
//!   ├─► Supervisor::start_all               (failures logged, absorbed)
//!   ├─► await termination signal            (the one blocking point)
//!   └─► Coordinator::shutdown ──► ExitStatus
//! ```
//!
//! Credential provisioning completes strictly before the bus is constructed
//! and before any service task is spawned, so the bus's initial auth table
//! already carries the internal entry and every service sees the same pair.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::bus::{BrokerLogger, BusFactory, BusOptions, LocalBus};
use crate::config::Settings;
use crate::credentials;
use crate::error::StartupError;
use crate::logging::{LogSink, TracingSink};
use crate::services::Registry;
use crate::tls;

use super::coordinator::{Coordinator, ExitStatus};
use super::shutdown::Termination;
use super::supervisor::Supervisor;

/// The platform's environment handle and entry point.
pub struct Runtime {
    settings: Settings,
    registry: Arc<Registry>,
    sink: Arc<dyn LogSink>,
    factory: BusFactory,
}

impl Runtime {
    /// Starts building a runtime over the given settings.
    pub fn builder(settings: Settings) -> RuntimeBuilder {
        RuntimeBuilder {
            settings,
            registry: Registry::new(),
            sink: TracingSink::shared(),
            factory: Box::new(LocalBus::open),
        }
    }

    /// Runs the platform until a termination signal arrives, then shuts it
    /// down and returns the aggregate exit status.
    ///
    /// Errors only before the running state is reached (TLS load, bus
    /// construction, signal registration); after that, every failure is
    /// logged and folded into the returned status.
    pub async fn run(self) -> Result<ExitStatus, StartupError> {
        let mut termination =
            Termination::arm().map_err(|source| StartupError::Signals { source })?;
        self.run_with(async move {
            let signal = termination.recv().await;
            info!("signal: {signal}");
        })
        .await
    }

    /// Runs startup, awaits `shutdown`, then tears everything down.
    async fn run_with(
        self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<ExitStatus, StartupError> {
        let tls_settings = &self.settings.mqtt.tls;
        let identity = if tls_settings.enabled {
            let loaded = tls::load_identity(
                Path::new(&tls_settings.certificate),
                Path::new(&tls_settings.key),
            )
            .map_err(|source| StartupError::Tls { source })?;
            Some(loaded)
        } else {
            None
        };

        let mut users = self.settings.mqtt.users.clone();
        let internal = credentials::provision(&mut users);

        let mut options = BusOptions::new()
            .with_users(users)
            .with_observer(BrokerLogger::new(self.sink.clone()).into_observer());
        if let Some(identity) = identity {
            options = options.with_tls(identity);
        }
        for addr in &self.settings.mqtt.listen {
            options = options.listen_on(addr.clone());
        }
        options = options.listen_on(self.settings.supervisor.loopback.clone());

        let bus = (self.factory)(options).map_err(|source| StartupError::Bus { source })?;

        let supervisor = Supervisor::new(
            self.registry.clone(),
            self.sink.clone(),
            self.settings.supervisor.start_grace(),
            internal,
        );
        supervisor.start_all(&self.settings).await;

        shutdown.await;

        let coordinator = Coordinator::new(self.registry.clone());
        Ok(coordinator.shutdown(&self.settings, bus).await)
    }
}

/// Builder assembling a [`Runtime`] from its parts.
pub struct RuntimeBuilder {
    settings: Settings,
    registry: Registry,
    sink: Arc<dyn LogSink>,
    factory: BusFactory,
}

impl RuntimeBuilder {
    /// Sets the service registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the default tracing-backed log sink.
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the default in-process bus factory. Deployments backed by a
    /// real broker plug its constructor in here.
    pub fn with_bus_factory(mut self, factory: BusFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> Runtime {
        Runtime {
            settings: self.settings,
            registry: Arc::new(self.registry),
            sink: self.sink,
            factory: self.factory,
        }
    }
}
