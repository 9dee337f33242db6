//! Diario de eventos de ejecución y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore, SharedEventStore};
pub use types::{event_variants, CompletionReason, FlowEvent, FlowEventKind};
