use log::info;

use super::{EntityEvent, EntityEventKind};
use crate::errors::{CoreError, Result};

/// Capacidad de eventos inyectada. El llamador consulta `is_enabled` antes de
/// construir y despachar un evento.
pub trait EventDispatcher {
    fn is_enabled(&self) -> bool;
    fn dispatch(&mut self, event: EntityEvent) -> Result<()>;
}

/// Registra cada evento despachado, en orden.
#[derive(Debug)]
pub struct InMemoryEventDispatcher {
    enabled: bool,
    events: Vec<EntityEvent>,
}

impl Default for InMemoryEventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self { enabled: true,
               events: Vec::new() }
    }

    pub fn disabled() -> Self {
        Self { enabled: false,
               events: Vec::new() }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn events(&self) -> &[EntityEvent] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<EntityEventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn dispatch(&mut self, event: EntityEvent) -> Result<()> {
        if !self.enabled {
            return Err(CoreError::Dispatch("dispatcher is disabled".into()));
        }
        self.events.push(event);
        Ok(())
    }
}

/// Escribe cada evento al log como una línea JSON.
#[derive(Debug, Clone, Copy)]
pub struct LogEventDispatcher {
    pub enabled: bool,
}

impl EventDispatcher for LogEventDispatcher {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn dispatch(&mut self, event: EntityEvent) -> Result<()> {
        let summary = serde_json::json!({
            "kind": event.kind,
            "deployment_id": event.entity.id,
            "name": event.entity.name,
            "tenant_id": event.entity.tenant_id,
            "version": event.entity.version,
            "definitions": event.entity.deployed_artifacts.len(),
        });
        info!("event {summary}");
        Ok(())
    }
}
