//! Service contract and registry.

mod registry;
mod service;

pub use registry::Registry;
pub use service::{Service, ServiceRef};
