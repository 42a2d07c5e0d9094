//! Contrato del compilador de artefactos y deployer de procesos de referencia.
use std::collections::BTreeSet;

use log::debug;

use super::{DefinitionCache, DeploymentSettings};
use crate::constants::PROCESS_RESOURCE_SUFFIXES;
use crate::errors::{CoreError, Result};
use crate::hashing::hash_bytes;
use crate::model::{Deployment, DeploymentId, ProcessDefinition, Resource, SuspensionState};

/// Convierte los recursos de un deployment en definiciones derivadas ligadas
/// a ese deployment. Corre después de insertar el deployment, así que siempre
/// tiene id.
pub trait DeploymentManager {
    fn deploy(&mut self, deployment: &mut Deployment, settings: &DeploymentSettings) -> Result<()>;

    /// Descarta el estado derivado de una admisión que no llegó a confirmarse.
    fn discard(&mut self, _deployment_id: DeploymentId) {}
}

/// Clave de proceso para un nombre de recurso, o `None` si el recurso no es
/// un archivo de proceso. La clave es el nombre sin sufijo ni directorios.
pub fn process_key(resource_name: &str) -> Option<&str> {
    let file = resource_name.rsplit('/').next().unwrap_or(resource_name);
    PROCESS_RESOURCE_SUFFIXES.iter()
                             .find_map(|suffix| file.strip_suffix(suffix))
                             .filter(|stem| !stem.is_empty())
}

/// Compila una definición por recurso de proceso y materializa el resultado
/// en un `DefinitionCache`.
///
/// Las versiones de definición son por (key, tenant) y solo avanzan con
/// deployments nuevos; un deployment rehidratado recupera sus definiciones.
#[derive(Debug, Clone, Default)]
pub struct ProcessDeployer {
    cache: DefinitionCache,
}

impl ProcessDeployer {
    pub fn new(cache: DefinitionCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &DefinitionCache {
        &self.cache
    }
}

fn validate(resource: &Resource, settings: &DeploymentSettings) -> Result<()> {
    let fail = |reason: &str| CoreError::Compilation { resource: resource.name.clone(),
                                                      reason: reason.to_string() };
    if settings.process_validation_enabled {
        if resource.bytes.is_empty() {
            return Err(fail("resource is empty"));
        }
        if std::str::from_utf8(&resource.bytes).is_err() {
            return Err(fail("content is not valid UTF-8"));
        }
    }
    if settings.bpmn20_xsd_validation_enabled {
        let text = String::from_utf8_lossy(&resource.bytes);
        if !text.trim_start().starts_with('<') {
            return Err(fail("content is not an XML document"));
        }
    }
    Ok(())
}

impl DeploymentManager for ProcessDeployer {
    fn deploy(&mut self, deployment: &mut Deployment, settings: &DeploymentSettings) -> Result<()> {
        let deployment_id =
            deployment.id
                      .ok_or_else(|| CoreError::Internal("deployment must be inserted before compilation".into()))?;

        if !deployment.is_new {
            deployment.deployed_artifacts = self.cache.for_deployment(deployment_id);
            debug!("deploy: restored {} cached definition(s) for deployment {deployment_id}",
                   deployment.deployed_artifacts.len());
            return Ok(());
        }

        let tenant = deployment.tenant_or_default().to_string();
        let mut seen_keys = BTreeSet::new();
        let mut compiled = Vec::new();
        for resource in deployment.resources.values().filter(|r| !r.generated) {
            let Some(key) = process_key(&resource.name) else {
                continue;
            };
            validate(resource, settings)?;
            if !seen_keys.insert(key.to_string()) {
                return Err(CoreError::Compilation { resource: resource.name.clone(),
                                                    reason: format!("process key '{key}' appears twice in the deployment") });
            }
            let version = self.cache.latest_version(key, &tenant).unwrap_or(0) + 1;
            compiled.push(ProcessDefinition { id: ProcessDefinition::compose_id(key, version, deployment_id),
                                              key: key.to_string(),
                                              name: key.to_string(),
                                              version,
                                              deployment_id,
                                              tenant_id: deployment.tenant_id.clone(),
                                              resource_name: resource.name.clone(),
                                              resource_digest: hash_bytes(&resource.bytes),
                                              suspension_state: SuspensionState::Active });
        }

        // nada entra a la caché salvo que todos los recursos compilen
        for definition in &compiled {
            self.cache.put(definition.clone());
        }
        debug!("deploy: compiled {} definition(s) for deployment {deployment_id}", compiled.len());
        deployment.deployed_artifacts = compiled;
        Ok(())
    }

    fn discard(&mut self, deployment_id: DeploymentId) {
        let removed = self.cache.remove_for_deployment(deployment_id);
        if removed > 0 {
            debug!("discard: evicted {removed} definition(s) of deployment {deployment_id}");
        }
    }
}
