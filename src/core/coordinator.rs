//! # Shutdown coordinator: ordered, failure-tolerant teardown.
//!
//! On termination the platform stops every enabled service (whether or not
//! its start ever succeeded), then closes the bus, and folds every failure
//! into a single [`ExitStatus`]. Nothing short-circuits: a failing stop is
//! logged and the sweep continues.
//!
//! ## Rules
//! - Services are stopped in configuration enumeration order; the bus is
//!   always closed last.
//! - `stop` is invoked for every enabled, registered service — absence of a
//!   successful start does not suppress it (the [`Service`] contract makes
//!   `stop` safe on a never-started service).
//! - No timeout is applied to `stop` or `close`; a hung stop hangs
//!   shutdown.
//!
//! [`Service`]: crate::Service

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use crate::bus::MessageBus;
use crate::config::Settings;
use crate::services::Registry;

/// Aggregate process exit status computed during shutdown.
///
/// Clean (`0`) unless any service stop or the bus close failed (`1`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExitStatus {
    failed: bool,
}

impl ExitStatus {
    /// A clean status.
    pub fn clean() -> Self {
        Self::default()
    }

    /// True when no shutdown step failed.
    pub fn is_clean(&self) -> bool {
        !self.failed
    }

    /// Numeric exit status: `0` clean, `1` failed.
    pub fn code(&self) -> i32 {
        i32::from(self.failed)
    }

    fn mark_failed(&mut self) {
        self.failed = true;
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code() as u8)
    }
}

/// Runs the ordered shutdown sequence.
pub struct Coordinator {
    registry: Arc<Registry>,
}

impl Coordinator {
    /// Creates a coordinator over the given service table.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Stops every enabled service, closes the bus, and returns the
    /// aggregate status.
    pub async fn shutdown(&self, settings: &Settings, bus: Box<dyn MessageBus>) -> ExitStatus {
        let mut status = ExitStatus::clean();

        for name in settings.enabled_services() {
            let Some(service) = self.registry.get(&name) else {
                continue;
            };
            info!("stopping service {name}");
            if let Err(err) = service.stop().await {
                error!("error stopping service {name}: {err}");
                status.mark_failed();
            }
        }

        if let Err(err) = bus.close().await {
            error!("error closing bus: {err}");
            status.mark_failed();
        }
        status
    }
}
