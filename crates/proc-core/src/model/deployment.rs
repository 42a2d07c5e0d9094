//! Agregado `Deployment`.
//!
//! Ciclo de vida:
//! - Lo construye el llamador (vía `DeploymentBuilder`) antes de la admisión.
//! - Solo lo muta el controlador de admisión durante una admisión
//!   (timestamp, versión, `is_new`, id asignado, artefactos desplegados).
//! - Inmutable una vez persistido y devuelto al llamador.
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProcessDefinition, Resource};
use crate::constants::NO_TENANT_ID;

/// Identificador asignado por el store. Los ids crecen con el orden de
/// inserción: ordenar por id es ordenar por inserción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeploymentId(pub i64);

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: Option<DeploymentId>,
    pub name: String,
    pub tenant_id: Option<String>,
    pub category: Option<String>,
    pub key: Option<String>,
    pub resources: BTreeMap<String, Resource>,
    pub version: i32,
    pub project_release_version: Option<String>,
    pub deployed_at: DateTime<Utc>,
    /// `true` solo para el deployment creado en la admisión actual;
    /// todo lo rehidratado desde un store lleva `false`.
    pub is_new: bool,
    #[serde(default)]
    pub deployed_artifacts: Vec<ProcessDefinition>,
}

impl Deployment {
    /// Candidato vacío. Versión 0 significa "sin asignar"; la admisión siempre
    /// estampa una versión >= 1 antes de persistir.
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: None,
               name: name.into(),
               tenant_id: None,
               category: None,
               key: None,
               resources: BTreeMap::new(),
               version: 0,
               project_release_version: None,
               deployed_at: DateTime::<Utc>::default(),
               is_new: false,
               deployed_artifacts: Vec::new() }
    }

    /// `None` y el centinela `NO_TENANT_ID` significan ambos "sin tenant".
    pub fn has_tenant(&self) -> bool {
        matches!(self.tenant_id.as_deref(), Some(t) if t != NO_TENANT_ID)
    }

    /// Tenant tal como se almacena: el centinela cuando no hay.
    pub fn tenant_or_default(&self) -> &str {
        self.tenant_id.as_deref().unwrap_or(NO_TENANT_ID)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn process_definitions(&self) -> &[ProcessDefinition] {
        &self.deployed_artifacts
    }
}
