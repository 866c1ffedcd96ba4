//! Pub-sub hooks for reconciliation events
//!
//! Other parts of the system (the server's audit trail, for example) can subscribe to events the engine emits. A
//! handler only sees the event itself, never the engine's internal state. Handlers may be async.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
