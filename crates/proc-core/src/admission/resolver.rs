//! Resolución de duplicados: ¿es el candidato el mismo deployment que el
//! último almacenado en su linaje?
use log::debug;

use crate::errors::Result;
use crate::model::{Deployment, VersionSignal};
use crate::store::DeploymentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Identical,
    Differs,
}

/// Último deployment almacenado en el linaje del candidato.
///
/// Los candidatos sin tenant usan la búsqueda "último por nombre" del store.
/// Los que tienen tenant toman el id más alto entre filas con mismo nombre y
/// tenant: decide el orden de inserción, no los timestamps.
pub fn find_existing(store: &dyn DeploymentStore, candidate: &Deployment) -> Result<Option<Deployment>> {
    if !candidate.has_tenant() {
        return store.find_latest_by_name(&candidate.name);
    }
    let found = store.find_by_name_and_tenant(&candidate.name, candidate.tenant_or_default())?;
    Ok(found.into_iter().next())
}

/// Clasifica el candidato frente a `existing`. La precedencia sigue la señal:
/// versión forzada, luego versión de manifiesto, luego contenido.
/// Lo que no se puede probar idéntico se considera distinto.
pub fn resolve(candidate: &Deployment, existing: Option<&Deployment>, signal: &VersionSignal) -> Resolution {
    let Some(existing) = existing else {
        return Resolution::Differs;
    };
    let identical = match signal {
        VersionSignal::Enforced(version) => *version == existing.version,
        VersionSignal::Manifest(release) => existing.project_release_version.as_deref() == Some(release.as_str()),
        VersionSignal::None => resources_match(candidate, existing),
    };
    debug!("resolve: '{}' against deployment {:?} -> identical={identical}",
           candidate.name,
           existing.id);
    if identical {
        Resolution::Identical
    } else {
        Resolution::Differs
    }
}

/// Comparación guiada por el candidato: cada recurso del candidato debe
/// existir del lado almacenado y coincidir byte a byte, salvo que la copia
/// almacenada sea generada. Los recursos extra almacenados se ignoran.
fn resources_match(candidate: &Deployment, existing: &Deployment) -> bool {
    if candidate.resources.is_empty() || existing.resources.is_empty() {
        return false;
    }
    candidate.resources.values().all(|resource| match existing.resource(&resource.name) {
                                    None => false,
                                    Some(saved) => saved.generated || saved.bytes == resource.bytes,
                                })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeploymentId, Resource};
    use crate::store::InMemoryDeploymentStore;

    fn with_resources(resources: Vec<Resource>) -> Deployment {
        let mut d = Deployment::new("orders");
        d.version = 1;
        for r in resources {
            d.resources.insert(r.name.clone(), r);
        }
        d
    }

    #[test]
    fn one_byte_difference_in_a_regular_resource_differs() {
        let stored = with_resources(vec![Resource::new("a.bpmn", "<a/>")]);
        let candidate = with_resources(vec![Resource::new("a.bpmn", "<b/>")]);
        assert_eq!(resolve(&candidate, Some(&stored), &VersionSignal::None), Resolution::Differs);
        assert_eq!(resolve(&stored.clone(), Some(&stored), &VersionSignal::None), Resolution::Identical);
    }

    #[test]
    fn generated_stored_resource_is_not_compared() {
        let stored = with_resources(vec![Resource::new("a.bpmn", "<a/>"), Resource::generated("a.png", vec![1u8])]);
        let candidate = with_resources(vec![Resource::new("a.bpmn", "<a/>"), Resource::generated("a.png", vec![2u8])]);
        assert_eq!(resolve(&candidate, Some(&stored), &VersionSignal::None), Resolution::Identical);
    }

    #[test]
    fn comparison_is_driven_by_the_candidate() {
        let stored = with_resources(vec![Resource::new("a.bpmn", "<a/>"), Resource::new("b.bpmn", "<b/>")]);
        let subset = with_resources(vec![Resource::new("a.bpmn", "<a/>")]);
        assert_eq!(resolve(&subset, Some(&stored), &VersionSignal::None), Resolution::Identical);
        assert_eq!(resolve(&stored, Some(&subset), &VersionSignal::None), Resolution::Differs);
    }

    #[test]
    fn missing_resources_or_existing_deployment_differ() {
        let empty = with_resources(vec![]);
        let full = with_resources(vec![Resource::new("a.bpmn", "<a/>")]);
        assert_eq!(resolve(&empty, Some(&full), &VersionSignal::None), Resolution::Differs);
        assert_eq!(resolve(&full, Some(&empty), &VersionSignal::None), Resolution::Differs);
        assert_eq!(resolve(&full, None, &VersionSignal::None), Resolution::Differs);
    }

    #[test]
    fn enforced_version_ignores_content() {
        let mut stored = with_resources(vec![Resource::new("a.bpmn", "<a/>")]);
        stored.version = 3;
        let changed = with_resources(vec![Resource::new("a.bpmn", "<changed/>")]);
        assert_eq!(resolve(&changed, Some(&stored), &VersionSignal::Enforced(3)), Resolution::Identical);
        assert_eq!(resolve(&stored, Some(&stored), &VersionSignal::Enforced(4)), Resolution::Differs);
    }

    #[test]
    fn manifest_version_compares_release_strings() {
        let mut stored = with_resources(vec![Resource::new("a.bpmn", "<a/>")]);
        stored.project_release_version = Some("1.1.0".into());
        let changed = with_resources(vec![Resource::new("a.bpmn", "<changed/>")]);
        assert_eq!(resolve(&changed, Some(&stored), &VersionSignal::Manifest("1.1.0".into())),
                   Resolution::Identical);
        stored.project_release_version = None;
        assert_eq!(resolve(&changed, Some(&stored), &VersionSignal::Manifest("1.1.0".into())),
                   Resolution::Differs);
    }

    #[test]
    fn tenanted_lookup_uses_highest_id_in_tenant() {
        let mut store = InMemoryDeploymentStore::new();
        for tenant in [Some("acme"), Some("acme"), Some("other"), None] {
            let mut d = with_resources(vec![]);
            d.tenant_id = tenant.map(str::to_string);
            store.insert(&mut d).unwrap();
        }
        let mut candidate = with_resources(vec![]);
        candidate.tenant_id = Some("acme".into());
        let found = find_existing(&store, &candidate).unwrap().unwrap();
        assert_eq!(found.id, Some(DeploymentId(2)));

        candidate.tenant_id = None;
        let found = find_existing(&store, &candidate).unwrap().unwrap();
        assert_eq!(found.id, Some(DeploymentId(4)));

        candidate.tenant_id = Some("nobody".into());
        assert!(find_existing(&store, &candidate).unwrap().is_none());
    }
}
