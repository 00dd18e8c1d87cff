//! # Service supervisor: concurrent startup with bounded observation.
//!
//! [`Supervisor::start_all`] brings up every enabled service. Each start
//! runs on its own task so one slow service cannot delay the others, but
//! the supervisor *observes* outcomes one service at a time, each within a
//! grace window:
//!
//! ```text
//! for name in enabled services (config enumeration order):
//!   ├─► resolve via Registry ── absent → "unsupported service", next
//!   ├─► scoped ServiceConfig (+ internal credentials when active)
//!   ├─► service.use_logger(sink)
//!   ├─► spawn service.start(config) ──► oneshot result channel
//!   └─► wait up to grace:
//!         ├─ Ok(())   → "<name> service started"
//!         ├─ Err(e)   → "failed starting <name> service", next
//!         └─ elapsed  → "timeout while starting service", next
//!                       (the start keeps running, unobserved)
//! ```
//!
//! ## Rules
//! - A start that outruns its grace window is **abandoned, not cancelled**;
//!   its eventual result is never observed. The grace period is an
//!   observation window, not an execution budget.
//! - Failures are logged and recorded, never escalated — one bad service
//!   must not keep the rest of the platform down.
//! - Observation is sequential, so worst-case startup latency with N hung
//!   services is N × grace. This buys strictly ordered startup logs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time;
use tracing::{error, info, warn};

use crate::config::{Settings, MQTT_PASS_KEY, MQTT_USER_KEY};
use crate::credentials::Credentials;
use crate::error::ServiceError;
use crate::logging::LogSink;
use crate::services::Registry;

/// Outcome of one service's observed start.
#[derive(Debug)]
pub enum StartOutcome {
    /// `start` returned `Ok` within the grace window.
    Started,
    /// `start` returned an error within the grace window.
    Failed(ServiceError),
    /// The grace window elapsed; the start was abandoned.
    TimedOut,
    /// The name has no registered service.
    Unsupported,
}

impl StartOutcome {
    /// True for [`StartOutcome::Started`].
    pub fn is_started(&self) -> bool {
        matches!(self, StartOutcome::Started)
    }
}

/// Starts enabled services concurrently and records per-service outcomes.
pub struct Supervisor {
    registry: Arc<Registry>,
    sink: Arc<dyn LogSink>,
    grace: Duration,
    credentials: Option<Credentials>,
}

impl Supervisor {
    /// Creates a supervisor.
    ///
    /// ### Parameters
    /// - `registry`: the service table startup resolves names against
    /// - `sink`: the log sink handed to every service via `use_logger`
    /// - `grace`: per-service observation window
    /// - `credentials`: internal bus credentials to inject, when active
    pub fn new(
        registry: Arc<Registry>,
        sink: Arc<dyn LogSink>,
        grace: Duration,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            registry,
            sink,
            grace,
            credentials,
        }
    }

    /// Starts every enabled service and returns the per-service outcomes in
    /// observation order.
    ///
    /// Failures are logged, recorded, and absorbed; this method never
    /// errors and never aborts early.
    pub async fn start_all(&self, settings: &Settings) -> Vec<(String, StartOutcome)> {
        let mut outcomes = Vec::new();
        for name in settings.enabled_services() {
            let outcome = self.start_one(&name, settings).await;
            outcomes.push((name, outcome));
        }
        outcomes
    }

    async fn start_one(&self, name: &str, settings: &Settings) -> StartOutcome {
        let Some(service) = self.registry.get(name) else {
            warn!("unsupported service: {name}");
            return StartOutcome::Unsupported;
        };

        let mut config = settings.service_config(name);
        if let Some(creds) = &self.credentials {
            config.insert(MQTT_USER_KEY, creds.username.as_str());
            config.insert(MQTT_PASS_KEY, creds.password.as_str());
        }

        service.use_logger(self.sink.clone());
        info!("starting service: {name}");

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(service.start(config).await);
        });

        match time::timeout(self.grace, rx).await {
            Ok(Ok(Ok(()))) => {
                info!("{name} service started");
                StartOutcome::Started
            }
            Ok(Ok(Err(err))) => {
                error!("failed starting {name} service: {err}");
                StartOutcome::Failed(err)
            }
            Ok(Err(_dropped)) => {
                // The spawned start panicked before sending its result.
                error!("failed starting {name} service: start aborted");
                StartOutcome::Failed(ServiceError::Start {
                    error: "start aborted".into(),
                })
            }
            Err(_elapsed) => {
                warn!("timeout while starting service");
                StartOutcome::TimedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServiceConfig, ServiceSettings};
    use crate::logging::TracingSink;
    use crate::services::Service;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    enum Behavior {
        Instant,
        Hang,
        Fail,
    }

    struct Recorder {
        behavior: Behavior,
        started: AtomicBool,
        seen_config: Mutex<Option<ServiceConfig>>,
    }

    impl Recorder {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                started: AtomicBool::new(false),
                seen_config: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl Service for Recorder {
        async fn start(&self, config: ServiceConfig) -> Result<(), ServiceError> {
            self.started.store(true, Ordering::SeqCst);
            *self.seen_config.lock().unwrap() = Some(config);
            match self.behavior {
                Behavior::Instant => Ok(()),
                Behavior::Hang => std::future::pending().await,
                Behavior::Fail => Err(ServiceError::Start {
                    error: "no such device".into(),
                }),
            }
        }

        async fn stop(&self) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    fn settings_with(names: &[&str]) -> Settings {
        let mut settings = Settings::default();
        for name in names {
            settings.services.insert(
                name.to_string(),
                ServiceSettings {
                    enabled: true,
                    options: HashMap::new(),
                },
            );
        }
        settings
    }

    fn supervisor(registry: Registry, credentials: Option<Credentials>) -> Supervisor {
        Supervisor::new(
            Arc::new(registry),
            TracingSink::shared(),
            Duration::from_secs(1),
            credentials,
        )
    }

    fn outcome<'a>(outcomes: &'a [(String, StartOutcome)], name: &str) -> &'a StartOutcome {
        &outcomes
            .iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("no outcome for {name}"))
            .1
    }

    #[tokio::test]
    async fn test_unsupported_service_does_not_stop_the_rest() {
        let lights = Recorder::new(Behavior::Instant);
        let registry = Registry::new().with("lights", lights.clone());
        let settings = settings_with(&["lights", "ghost"]);

        let outcomes = supervisor(registry, None).start_all(&settings).await;

        assert!(matches!(outcome(&outcomes, "ghost"), StartOutcome::Unsupported));
        assert!(outcome(&outcomes, "lights").is_started());
        assert!(lights.started.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_start_times_out_without_blocking_others() {
        let lights = Recorder::new(Behavior::Instant);
        let stuck = Recorder::new(Behavior::Hang);
        let registry = Registry::new()
            .with("lights", lights.clone())
            .with("stuck", stuck.clone());
        let settings = settings_with(&["lights", "stuck"]);

        let outcomes = supervisor(registry, None).start_all(&settings).await;

        assert!(matches!(outcome(&outcomes, "stuck"), StartOutcome::TimedOut));
        assert!(outcome(&outcomes, "lights").is_started());
        assert!(
            stuck.started.load(Ordering::SeqCst),
            "the hung start was dispatched, then abandoned"
        );
    }

    #[tokio::test]
    async fn test_failed_start_is_recorded_and_others_continue() {
        let broken = Recorder::new(Behavior::Fail);
        let lights = Recorder::new(Behavior::Instant);
        let registry = Registry::new()
            .with("broken", broken)
            .with("lights", lights.clone());
        let settings = settings_with(&["broken", "lights"]);

        let outcomes = supervisor(registry, None).start_all(&settings).await;

        assert!(matches!(outcome(&outcomes, "broken"), StartOutcome::Failed(_)));
        assert!(outcome(&outcomes, "lights").is_started());
    }

    #[tokio::test]
    async fn test_disabled_services_are_not_started() {
        let lights = Recorder::new(Behavior::Instant);
        let registry = Registry::new().with("lights", lights.clone());
        let mut settings = settings_with(&[]);
        settings
            .services
            .insert("lights".to_string(), ServiceSettings::default());

        let outcomes = supervisor(registry, None).start_all(&settings).await;

        assert!(outcomes.is_empty());
        assert!(!lights.started.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_credentials_are_injected_when_active() {
        let lights = Recorder::new(Behavior::Instant);
        let registry = Registry::new().with("lights", lights.clone());
        let settings = settings_with(&["lights"]);
        let creds = Credentials {
            username: "GeneratedUser".into(),
            password: "GeneratedPass".into(),
        };

        supervisor(registry, Some(creds)).start_all(&settings).await;

        let seen = lights.seen_config.lock().unwrap();
        let config = seen.as_ref().expect("service saw its config");
        assert_eq!(config.get_str(MQTT_USER_KEY), Some("GeneratedUser"));
        assert_eq!(config.get_str(MQTT_PASS_KEY), Some("GeneratedPass"));
    }

    #[tokio::test]
    async fn test_no_credentials_when_provisioning_inactive() {
        let lights = Recorder::new(Behavior::Instant);
        let registry = Registry::new().with("lights", lights.clone());
        let settings = settings_with(&["lights"]);

        supervisor(registry, None).start_all(&settings).await;

        let seen = lights.seen_config.lock().unwrap();
        let config = seen.as_ref().expect("service saw its config");
        assert!(config.get_str(MQTT_USER_KEY).is_none());
        assert!(config.get_str(MQTT_PASS_KEY).is_none());
    }
}
