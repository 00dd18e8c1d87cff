//! # Configuration for the hearth runtime.
//!
//! Settings are loaded from, in order of precedence:
//! 1. the system-wide file (`/etc/hearth/config.toml`),
//! 2. an operator-specified file,
//! 3. environment variables prefixed with `HEARTH_` (`__` separates nested
//!    keys, e.g. `HEARTH_MQTT__LISTEN`).
//!
//! The runtime reads only the `mqtt` and `supervisor` sections plus the
//! per-service `enabled` flag; everything else under `services.<name>` is an
//! opaque subtree handed to that service as its [`ServiceConfig`].

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;

/// Configuration key under which the internal bus username is injected into
/// each service's scoped config.
pub const MQTT_USER_KEY: &str = "mqtt.user";
/// Configuration key under which the internal bus password is injected.
pub const MQTT_PASS_KEY: &str = "mqtt.pass";

/// Root settings for one process run.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Settings {
    /// Message bus section.
    #[serde(default)]
    pub mqtt: MqttSettings,
    /// Supervisor tunables.
    #[serde(default)]
    pub supervisor: SupervisorSettings,
    /// Service table, keyed by service name.
    #[serde(default)]
    pub services: HashMap<String, ServiceSettings>,
}

/// Bus listener, auth, and TLS configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MqttSettings {
    /// TLS listener settings.
    #[serde(default)]
    pub tls: TlsSettings,
    /// Authorized `username -> password` map. An empty map means anonymous
    /// access; a non-empty map triggers internal credential provisioning.
    #[serde(default)]
    pub users: HashMap<String, String>,
    /// Listener URLs (e.g. `tcp://0.0.0.0:1883`). The loopback listener is
    /// always appended after these.
    #[serde(default)]
    pub listen: Vec<String>,
}

/// TLS section of the bus configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TlsSettings {
    /// Whether the bus should present a TLS identity.
    #[serde(default)]
    pub enabled: bool,
    /// Path to the PEM certificate chain.
    #[serde(default)]
    pub certificate: String,
    /// Path to the PEM private key.
    #[serde(default)]
    pub key: String,
}

/// Supervisor tunables.
///
/// Defaults:
/// - `start_grace_ms = 1000` — how long a service start is observed before
///   the supervisor gives up on it and moves on,
/// - `loopback = "tcp://127.0.0.1:1883"` — the always-on local listener.
#[derive(Clone, Debug, Deserialize)]
pub struct SupervisorSettings {
    /// Observation window for each service start, in milliseconds.
    #[serde(default = "default_start_grace_ms")]
    pub start_grace_ms: u64,
    /// Always-on loopback listener URL, appended after the configured ones.
    #[serde(default = "default_loopback")]
    pub loopback: String,
}

impl SupervisorSettings {
    /// Start grace as a [`Duration`].
    pub fn start_grace(&self) -> Duration {
        Duration::from_millis(self.start_grace_ms)
    }
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            start_grace_ms: default_start_grace_ms(),
            loopback: default_loopback(),
        }
    }
}

/// Per-service entry in the service table.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServiceSettings {
    /// Only enabled services are started and stopped.
    #[serde(default)]
    pub enabled: bool,
    /// Everything else under `services.<name>` — opaque to the runtime,
    /// passed through to the service.
    #[serde(flatten)]
    pub options: HashMap<String, Value>,
}

impl Settings {
    /// Loads settings from the standard sources plus an optional
    /// operator-specified file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("/etc/hearth/config").required(false));
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("HEARTH").separator("__"));
        builder.build()?.try_deserialize()
    }

    /// Names of services with `enabled = true`, in the service table's
    /// enumeration order. The order is stable within one call but not
    /// deterministic across runs.
    pub fn enabled_services(&self) -> Vec<String> {
        self.services
            .iter()
            .filter(|(_, svc)| svc.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// True when `services.<name>.enabled` is set.
    pub fn service_enabled(&self, name: &str) -> bool {
        self.services.get(name).is_some_and(|svc| svc.enabled)
    }

    /// Builds the scoped view of `services.<name>` handed to that service.
    pub fn service_config(&self, name: &str) -> ServiceConfig {
        let values = self
            .services
            .get(name)
            .map(|svc| svc.options.clone())
            .unwrap_or_default();
        ServiceConfig {
            service: name.to_string(),
            values,
        }
    }
}

/// Scoped, mutable view of the configuration rooted at `services.<name>`.
///
/// Created per service per run and discarded after `start` consumes it. The
/// supervisor may insert the internal bus credentials under
/// [`MQTT_USER_KEY`] / [`MQTT_PASS_KEY`] before handing it over.
#[derive(Clone, Debug, Default)]
pub struct ServiceConfig {
    service: String,
    values: HashMap<String, Value>,
}

impl ServiceConfig {
    /// Name of the service this view is rooted at.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Raw value lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String lookup; `None` when absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Boolean lookup; `None` when absent or not a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    /// Sets or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }
}

fn default_start_grace_ms() -> u64 {
    1000
}

fn default_loopback() -> String {
    "tcp://127.0.0.1:1883".to_string()
}
