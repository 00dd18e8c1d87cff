//! Internal credential provisioning in action: the operator configures a
//! user map, so the runtime generates an ephemeral internal pair and every
//! service finds it in its scoped config.
//!
//! Run with:
//! ```text
//! RUST_LOG=info cargo run --example with_users
//! ```

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hearth::{
    LogSink, Registry, Runtime, Service, ServiceConfig, ServiceError, ServiceSettings, Settings,
    MQTT_USER_KEY,
};

struct Thermostat {
    sink: Mutex<Option<Arc<dyn LogSink>>>,
}

#[async_trait]
impl Service for Thermostat {
    async fn start(&self, config: ServiceConfig) -> Result<(), ServiceError> {
        if let Some(sink) = self.sink.lock().unwrap().as_ref() {
            match config.get_str(MQTT_USER_KEY) {
                Some(user) => sink.log(&format!(
                    "thermostat: got internal bus user ({} chars)",
                    user.len()
                )),
                None => sink.log("thermostat: bus is anonymous, no credentials"),
            }
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    fn use_logger(&self, sink: Arc<dyn LogSink>) {
        *self.sink.lock().unwrap() = Some(sink);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    hearth::logging::init();

    let mut settings = Settings::default();
    settings
        .mqtt
        .users
        .insert("admin".to_string(), "hunter2".to_string());
    settings.services.insert(
        "thermostat".to_string(),
        ServiceSettings {
            enabled: true,
            ..ServiceSettings::default()
        },
    );

    let registry = Registry::new().with(
        "thermostat",
        Arc::new(Thermostat {
            sink: Mutex::new(None),
        }),
    );

    let status = Runtime::builder(settings)
        .with_registry(registry)
        .build()
        .run()
        .await?;
    Ok(status.into())
}
