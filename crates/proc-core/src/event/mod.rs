//! Eventos de ciclo de vida y la capacidad de despacho.

mod dispatcher;
mod types;

pub use dispatcher::{EventDispatcher, InMemoryEventDispatcher, LogEventDispatcher};
pub use types::{EntityEvent, EntityEventKind};
