//! Caché compartida de definiciones de proceso compiladas.
//!
//! Clonar un `DefinitionCache` clona el handle, no el contenido: el deployer
//! que la llena y el canal de comandos que cambia estados de suspensión ven
//! el mismo mapa.
use std::sync::Arc;

use dashmap::DashMap;

use crate::errors::{CoreError, Result};
use crate::model::{DeploymentId, ProcessDefinition, SuspensionState};

#[derive(Debug, Clone, Default)]
pub struct DefinitionCache {
    inner: Arc<DashMap<String, ProcessDefinition>>,
}

impl DefinitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, definition: ProcessDefinition) {
        self.inner.insert(definition.id.clone(), definition);
    }

    pub fn get(&self, id: &str) -> Option<ProcessDefinition> {
        self.inner.get(id).map(|d| d.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Definiciones de un deployment, ordenadas por id.
    pub fn for_deployment(&self, deployment_id: DeploymentId) -> Vec<ProcessDefinition> {
        let mut found: Vec<ProcessDefinition> = self.inner
                                                    .iter()
                                                    .filter(|d| d.deployment_id == deployment_id)
                                                    .map(|d| d.value().clone())
                                                    .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    pub fn remove_for_deployment(&self, deployment_id: DeploymentId) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, d| d.deployment_id != deployment_id);
        before - self.inner.len()
    }

    /// Versión de definición más alta conocida para `key` dentro de un tenant
    /// (`""` para definiciones sin tenant).
    pub fn latest_version(&self, key: &str, tenant_id: &str) -> Option<i32> {
        self.inner
            .iter()
            .filter(|d| d.key == key && d.tenant_id.as_deref().unwrap_or("") == tenant_id)
            .map(|d| d.version)
            .max()
    }

    /// Mueve una definición a `target`. Reentrar en el estado actual se
    /// rechaza.
    pub fn transition(&self, id: &str, target: SuspensionState) -> Result<ProcessDefinition> {
        let mut entry = self.inner
                            .get_mut(id)
                            .ok_or_else(|| CoreError::DefinitionNotFound(id.to_string()))?;
        if entry.suspension_state == target {
            return Err(CoreError::InvalidStateTransition { definition_id: id.to_string(),
                                                           state: target.to_string() });
        }
        entry.suspension_state = target;
        Ok(entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(key: &str, version: i32, deployment: i64, tenant: Option<&str>) -> ProcessDefinition {
        let deployment_id = DeploymentId(deployment);
        ProcessDefinition { id: ProcessDefinition::compose_id(key, version, deployment_id),
                            key: key.into(),
                            name: key.into(),
                            version,
                            deployment_id,
                            tenant_id: tenant.map(str::to_string),
                            resource_name: format!("{key}.bpmn"),
                            resource_digest: String::new(),
                            suspension_state: SuspensionState::Active }
    }

    #[test]
    fn latest_version_is_scoped_by_tenant() {
        let cache = DefinitionCache::new();
        cache.put(definition("order", 1, 1, None));
        cache.put(definition("order", 2, 2, None));
        cache.put(definition("order", 7, 3, Some("acme")));
        assert_eq!(cache.latest_version("order", ""), Some(2));
        assert_eq!(cache.latest_version("order", "acme"), Some(7));
        assert_eq!(cache.latest_version("invoice", ""), None);
    }

    #[test]
    fn transition_rejects_same_state() {
        let cache = DefinitionCache::new();
        cache.put(definition("order", 1, 1, None));
        let suspended = cache.transition("order:1:1", SuspensionState::Suspended).unwrap();
        assert!(suspended.is_suspended());
        let err = cache.transition("order:1:1", SuspensionState::Suspended).unwrap_err();
        assert!(matches!(err, CoreError::InvalidStateTransition { .. }));
        assert!(matches!(cache.transition("missing", SuspensionState::Active),
                         Err(CoreError::DefinitionNotFound(_))));
    }

    #[test]
    fn clones_share_contents_and_removal_is_per_deployment() {
        let cache = DefinitionCache::new();
        let handle = cache.clone();
        cache.put(definition("order", 1, 1, None));
        cache.put(definition("invoice", 1, 2, None));
        assert_eq!(handle.len(), 2);
        assert_eq!(handle.remove_for_deployment(DeploymentId(1)), 1);
        assert!(cache.get("order:1:1").is_none());
        assert_eq!(cache.for_deployment(DeploymentId(2)).len(), 1);
    }
}
