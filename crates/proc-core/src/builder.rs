//! Builder de solicitudes de deployment.
//!
//! `DeploymentBuilder` reúne los recursos y los metadatos opcionales de
//! admisión que envía un llamador. Consume `self` en cada llamada para armar
//! la solicitud en una sola expresión:
//!
//! ```ignore
//! let request = DeploymentBuilder::new()
//!     .name("orders")
//!     .tenant_id("acme")
//!     .add_string("order.bpmn20.xml", "<definitions/>")
//!     .enable_duplicate_filtering()
//!     .build()?;
//! ```
//!
//! La unicidad de nombres de recurso, un nombre no vacío y una versión forzada
//! positiva se validan una sola vez, en `build`.

use chrono::{DateTime, Utc};

use crate::deploy::DeploymentSettings;
use crate::errors::{CoreError, Result};
use crate::model::{Deployment, ReleaseManifest, Resource, VersionSignal};

/// Envío completo, listo para la admisión.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub deployment: Deployment,
    pub duplicate_filter_enabled: bool,
    pub bpmn20_xsd_validation_enabled: bool,
    pub process_validation_enabled: bool,
    pub activation_date: Option<DateTime<Utc>>,
    pub manifest: Option<ReleaseManifest>,
    pub enforced_app_version: Option<i32>,
}

impl DeploymentRequest {
    pub fn version_signal(&self) -> VersionSignal {
        VersionSignal::from_parts(self.enforced_app_version, self.manifest.as_ref())
    }

    pub fn settings(&self) -> DeploymentSettings {
        DeploymentSettings { bpmn20_xsd_validation_enabled: self.bpmn20_xsd_validation_enabled,
                             process_validation_enabled: self.process_validation_enabled }
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentBuilder {
    deployment: Deployment,
    duplicate_name: Option<String>,
    duplicate_filter_enabled: bool,
    bpmn20_xsd_validation_enabled: bool,
    process_validation_enabled: bool,
    activation_date: Option<DateTime<Utc>>,
    manifest: Option<ReleaseManifest>,
    enforced_app_version: Option<i32>,
}

impl Default for DeploymentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeploymentBuilder {
    pub fn new() -> Self {
        Self { deployment: Deployment::new(""),
               duplicate_name: None,
               duplicate_filter_enabled: false,
               bpmn20_xsd_validation_enabled: true,
               process_validation_enabled: true,
               activation_date: None,
               manifest: None,
               enforced_app_version: None }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.deployment.name = name.into();
        self
    }

    pub fn tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.deployment.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.deployment.category = Some(category.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.deployment.key = Some(key.into());
        self
    }

    pub fn add_bytes(self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.add_resource(Resource::new(name, bytes))
    }

    pub fn add_string(self, name: impl Into<String>, text: impl AsRef<str>) -> Self {
        self.add_resource(Resource::new(name, text.as_ref().as_bytes()))
    }

    /// Añade un artefacto producido por el motor, excluido de la comparación de duplicados.
    pub fn add_generated(self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.add_resource(Resource::generated(name, bytes))
    }

    pub fn add_resource(mut self, resource: Resource) -> Self {
        if self.deployment.resources.contains_key(&resource.name) {
            // se conserva el primer infractor; build() lo reporta
            self.duplicate_name.get_or_insert_with(|| resource.name.clone());
        } else {
            self.deployment.resources.insert(resource.name.clone(), resource);
        }
        self
    }

    pub fn enable_duplicate_filtering(mut self) -> Self {
        self.duplicate_filter_enabled = true;
        self
    }

    pub fn duplicate_filtering(mut self, enabled: bool) -> Self {
        self.duplicate_filter_enabled = enabled;
        self
    }

    pub fn disable_schema_validation(mut self) -> Self {
        self.bpmn20_xsd_validation_enabled = false;
        self
    }

    pub fn disable_process_validation(mut self) -> Self {
        self.process_validation_enabled = false;
        self
    }

    pub fn activate_process_definitions_on(mut self, date: DateTime<Utc>) -> Self {
        self.activation_date = Some(date);
        self
    }

    pub fn project_manifest(mut self, manifest: ReleaseManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn enforced_app_version(mut self, version: i32) -> Self {
        self.enforced_app_version = Some(version);
        self
    }

    pub fn build(self) -> Result<DeploymentRequest> {
        if self.deployment.name.trim().is_empty() {
            return Err(CoreError::InvalidBundle("deployment name cannot be empty".into()));
        }
        if let Some(name) = self.duplicate_name {
            return Err(CoreError::DuplicateResource(name));
        }
        if let Some(v) = self.enforced_app_version {
            if v < 1 {
                return Err(CoreError::InvalidBundle(format!("enforced version must be >= 1 (got {v})")));
            }
        }
        Ok(DeploymentRequest { deployment: self.deployment,
                               duplicate_filter_enabled: self.duplicate_filter_enabled,
                               bpmn20_xsd_validation_enabled: self.bpmn20_xsd_validation_enabled,
                               process_validation_enabled: self.process_validation_enabled,
                               activation_date: self.activation_date,
                               manifest: self.manifest,
                               enforced_app_version: self.enforced_app_version })
    }
}
