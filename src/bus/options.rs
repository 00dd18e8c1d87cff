//! # Bus construction parameters.
//!
//! [`BusOptions`] bundles everything a broker needs from the platform: the
//! TLS identity (if any), the authorized user map (already containing the
//! internal entry when provisioning ran), the listener URLs, and the event
//! observer. The runtime builds one per process run and hands it to the
//! [`BusFactory`](super::BusFactory).

use std::collections::HashMap;

use crate::tls::TlsIdentity;

use super::events::BrokerObserver;

/// Parameters for constructing the message bus.
#[derive(Default)]
pub struct BusOptions {
    /// TLS identity for the listeners, when TLS is enabled.
    pub tls: Option<TlsIdentity>,
    /// Authorized `username -> password` map. Empty means anonymous access.
    pub users: HashMap<String, String>,
    /// Listener URLs in bind order; the last entry is the always-on
    /// loopback listener.
    pub listeners: Vec<String>,
    /// Observer invoked on every broker event.
    pub observer: Option<BrokerObserver>,
}

impl BusOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TLS identity.
    pub fn with_tls(mut self, tls: TlsIdentity) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Sets the authorized user map.
    pub fn with_users(mut self, users: HashMap<String, String>) -> Self {
        self.users = users;
        self
    }

    /// Appends a listener URL.
    pub fn listen_on(mut self, addr: impl Into<String>) -> Self {
        self.listeners.push(addr.into());
        self
    }

    /// Sets the broker event observer.
    pub fn with_observer(mut self, observer: BrokerObserver) -> Self {
        self.observer = Some(observer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listeners_keep_append_order() {
        let options = BusOptions::new()
            .listen_on("tcp://0.0.0.0:1883")
            .listen_on("ssl://0.0.0.0:8883")
            .listen_on("tcp://127.0.0.1:1883");
        assert_eq!(
            options.listeners,
            vec![
                "tcp://0.0.0.0:1883",
                "ssl://0.0.0.0:8883",
                "tcp://127.0.0.1:1883"
            ]
        );
    }
}
