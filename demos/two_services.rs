//! Two cooperating services on the in-process bus (a motion sensor that
//! publishes readings and a hallway rule that reacts to them), plus a
//! deliberately slow bridge that shows the supervisor's grace window.
//!
//! Run with:
//! ```text
//! RUST_LOG=info cargo run --example two_services
//! ```
//! then press Ctrl-C for an orderly shutdown.

use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hearth::{
    BusError, LocalBus, LogSink, Message, MessageBus, Registry, Runtime, Service, ServiceConfig,
    ServiceError, ServiceSettings, Settings,
};

/// Shares one in-process bus between the runtime (which closes it) and the
/// demo services (which publish and subscribe on it).
struct SharedBus(Arc<LocalBus>);

#[async_trait]
impl MessageBus for SharedBus {
    async fn close(&self) -> Result<(), BusError> {
        self.0.close().await
    }
}

struct MotionSensor {
    bus: Arc<LocalBus>,
    ticker: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

#[async_trait]
impl Service for MotionSensor {
    async fn start(&self, config: ServiceConfig) -> Result<(), ServiceError> {
        let topic = config
            .get_str("topic")
            .unwrap_or("home/hall/motion")
            .to_string();
        let bus = self.bus.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(2)).await;
                let _ = bus.publish(Message::new(topic.clone(), b"on".to_vec()));
            }
        });
        *self.ticker.lock().unwrap() = Some(handle);
        Ok(())
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        if let Some(handle) = self.ticker.lock().unwrap().take() {
            handle.abort();
        }
        Ok(())
    }
}

struct HallwayRule {
    bus: Arc<LocalBus>,
    sink: Mutex<Option<Arc<dyn LogSink>>>,
    worker: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

#[async_trait]
impl Service for HallwayRule {
    async fn start(&self, _config: ServiceConfig) -> Result<(), ServiceError> {
        let mut rx = self.bus.subscribe();
        let sink = self.sink.lock().unwrap().clone();
        let handle = tokio::spawn(async move {
            while let Ok(message) = rx.recv().await {
                if let Some(sink) = &sink {
                    sink.log(&format!("hallway rule: motion on {}", message.topic));
                }
            }
        });
        *self.worker.lock().unwrap() = Some(handle);
        Ok(())
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        if let Some(handle) = self.worker.lock().unwrap().take() {
            handle.abort();
        }
        Ok(())
    }

    fn use_logger(&self, sink: Arc<dyn LogSink>) {
        *self.sink.lock().unwrap() = Some(sink);
    }
}

/// Takes longer to start than the supervisor is willing to watch.
struct SlowBridge;

#[async_trait]
impl Service for SlowBridge {
    async fn start(&self, _config: ServiceConfig) -> Result<(), ServiceError> {
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

fn enabled() -> ServiceSettings {
    ServiceSettings {
        enabled: true,
        ..ServiceSettings::default()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    hearth::logging::init();

    let mut settings = Settings::default();
    settings.services.insert("motion".into(), enabled());
    settings.services.insert("hallway-rule".into(), enabled());
    settings.services.insert("bridge".into(), enabled());

    let bus = Arc::new(LocalBus::new(64));
    let registry = Registry::new()
        .with(
            "motion",
            Arc::new(MotionSensor {
                bus: bus.clone(),
                ticker: Mutex::new(None),
            }),
        )
        .with(
            "hallway-rule",
            Arc::new(HallwayRule {
                bus: bus.clone(),
                sink: Mutex::new(None),
                worker: Mutex::new(None),
            }),
        )
        .with("bridge", Arc::new(SlowBridge));

    let status = Runtime::builder(settings)
        .with_registry(registry)
        .with_bus_factory(Box::new(move |_options| {
            Ok(Box::new(SharedBus(bus)) as Box<dyn MessageBus>)
        }))
        .build()
        .run()
        .await?;
    Ok(status.into())
}
