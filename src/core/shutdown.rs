//! # OS termination signals.
//!
//! The platform shuts down on **SIGINT** (Ctrl-C) or **SIGTERM** (systemd's
//! default kill signal); no other signal is handled. On non-Unix platforms
//! only Ctrl-C is available.
//!
//! Listeners are armed with [`Termination::arm`] *before* service startup
//! begins: a signal delivered while services are still starting is buffered
//! by the armed streams and observed as soon as the runtime reaches
//! [`Termination::recv`], so even a mid-startup signal produces an orderly
//! shutdown.

use std::io;

/// Armed termination-signal listeners.
#[cfg(unix)]
pub struct Termination {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Termination {
    /// Registers the signal listeners. From this point on, a delivered
    /// signal is retained until [`recv`](Self::recv) picks it up.
    pub fn arm() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Waits for a termination signal; returns its name for the log.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigint.recv() => "SIGINT",
            _ = self.sigterm.recv() => "SIGTERM",
        }
    }
}

/// Armed termination-signal listeners.
#[cfg(not(unix))]
pub struct Termination;

#[cfg(not(unix))]
impl Termination {
    /// Registers the Ctrl-C listener.
    pub fn arm() -> io::Result<Self> {
        Ok(Self)
    }

    /// Waits for Ctrl-C; returns its name for the log.
    pub async fn recv(&mut self) -> &'static str {
        let _ = tokio::signal::ctrl_c().await;
        "interrupt"
    }
}
