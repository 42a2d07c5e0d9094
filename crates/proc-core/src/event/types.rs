//! Eventos de ciclo de vida de entidades emitidos por la admisión.
//!
//! Una admisión exitosa (no duplicada) emite exactamente un `EntityCreated`
//! justo tras insertar el deployment y un `EntityInitialized` cuando terminan
//! la compilación y la programación de activación. El atajo de duplicado no
//! emite nada.
use serde::{Deserialize, Serialize};

use crate::model::Deployment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityEventKind {
    EntityCreated,
    EntityInitialized,
}

/// Payload del evento: snapshot del deployment al momento de emitir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEvent {
    pub kind: EntityEventKind,
    pub entity: Deployment,
}

impl EntityEvent {
    pub fn created(deployment: &Deployment) -> Self {
        Self { kind: EntityEventKind::EntityCreated,
               entity: deployment.clone() }
    }

    pub fn initialized(deployment: &Deployment) -> Self {
        Self { kind: EntityEventKind::EntityInitialized,
               entity: deployment.clone() }
    }
}
