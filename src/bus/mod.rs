//! Message-bus boundary: construction options, the bus handle, the broker
//! event vocabulary, the logging adapter, and an in-process bus.

mod events;
mod local;
mod logger;
mod message_bus;
mod options;

pub use events::{BrokerEvent, BrokerObserver, ClientHandle, Message, PacketKind};
pub use local::LocalBus;
pub use logger::BrokerLogger;
pub use message_bus::{BusFactory, MessageBus};
pub use options::BusOptions;
