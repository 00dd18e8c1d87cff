//! Runtime orchestration: supervisor, shutdown coordinator, signal
//! handling, and the process-lifetime runtime.

mod coordinator;
mod runtime;
mod shutdown;
mod supervisor;

pub use coordinator::{Coordinator, ExitStatus};
pub use runtime::{Runtime, RuntimeBuilder};
pub use shutdown::Termination;
pub use supervisor::{StartOutcome, Supervisor};
