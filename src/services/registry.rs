//! # Service registry.
//!
//! Name-keyed table of the services compiled into this platform build.
//! Populated once at process start, then shared read-only with the
//! supervisor (startup) and the coordinator (shutdown); no global state.
//!
//! A name present in configuration but absent here is an "unsupported
//! service" — logged and skipped, never fatal.

use std::collections::HashMap;

use super::service::ServiceRef;

/// Read-mostly map of service name to service.
#[derive(Default)]
pub struct Registry {
    services: HashMap<String, ServiceRef>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service under its configuration key, replacing any
    /// earlier registration with the same name.
    pub fn register(&mut self, name: impl Into<String>, service: ServiceRef) {
        self.services.insert(name.into(), service);
    }

    /// Fluent variant of [`register`](Self::register) for build-time wiring.
    pub fn with(mut self, name: impl Into<String>, service: ServiceRef) -> Self {
        self.register(name, service);
        self
    }

    /// Looks a service up by name.
    pub fn get(&self, name: &str) -> Option<ServiceRef> {
        self.services.get(name).cloned()
    }

    /// Registered service names, unordered.
    pub fn names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::error::ServiceError;
    use crate::services::Service;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Noop;

    #[async_trait]
    impl Service for Noop {
        async fn start(&self, _config: ServiceConfig) -> Result<(), ServiceError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new()
            .with("lights", Arc::new(Noop))
            .with("thermostat", Arc::new(Noop));

        assert_eq!(registry.len(), 2);
        assert!(registry.get("lights").is_some());
        assert!(registry.get("blinds").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let first: ServiceRef = Arc::new(Noop);
        let second: ServiceRef = Arc::new(Noop);
        let mut registry = Registry::new();
        registry.register("lights", first);
        registry.register("lights", Arc::clone(&second));

        let resolved = registry.get("lights").expect("registered");
        assert!(Arc::ptr_eq(&resolved, &second));
        assert_eq!(registry.len(), 1);
    }
}
