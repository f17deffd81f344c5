//! Domain events and their in-process distribution.
//!
//! Cart and inquiry modules describe what happened as events; the bus fans
//! them out to whoever renders confirmations or persists drafts.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
