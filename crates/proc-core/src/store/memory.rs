use log::debug;

use super::DeploymentStore;
use crate::errors::Result;
use crate::model::{Deployment, DeploymentId};

/// Store sobre vectores con separación pendiente/confirmado.
#[derive(Debug, Default)]
pub struct InMemoryDeploymentStore {
    committed: Vec<Deployment>,
    pending: Vec<Deployment>,
    last_id: i64,
}

impl InMemoryDeploymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filas durables, en orden de inserción.
    pub fn committed(&self) -> &[Deployment] {
        &self.committed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn visible(&self) -> impl Iterator<Item = &Deployment> {
        self.committed.iter().chain(self.pending.iter())
    }
}

fn rehydrate(deployment: &Deployment) -> Deployment {
    Deployment { is_new: false,
                 ..deployment.clone() }
}

impl DeploymentStore for InMemoryDeploymentStore {
    fn find_latest_by_name(&self, name: &str) -> Result<Option<Deployment>> {
        Ok(self.visible()
               .filter(|d| d.name == name && !d.has_tenant())
               .max_by_key(|d| (d.deployed_at, d.id))
               .map(rehydrate))
    }

    fn find_by_name_and_tenant(&self, name: &str, tenant_id: &str) -> Result<Vec<Deployment>> {
        let mut found: Vec<Deployment> = self.visible()
                                             .filter(|d| d.name == name && d.tenant_or_default() == tenant_id)
                                             .map(rehydrate)
                                             .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(found)
    }

    fn find_by_id(&self, id: DeploymentId) -> Result<Option<Deployment>> {
        Ok(self.visible().find(|d| d.id == Some(id)).map(rehydrate))
    }

    fn insert(&mut self, deployment: &mut Deployment) -> Result<DeploymentId> {
        self.last_id += 1;
        let id = DeploymentId(self.last_id);
        deployment.id = Some(id);
        // los artefactos derivados pertenecen a la caché del compilador, no a la fila
        self.pending.push(Deployment { deployed_artifacts: Vec::new(),
                                       ..deployment.clone() });
        debug!("insert: deployment id={id} name={} pending={}", deployment.name, self.pending.len());
        Ok(id)
    }

    fn flush(&mut self) -> Result<()> {
        debug!("flush: committing {} deployment(s)", self.pending.len());
        self.committed.append(&mut self.pending);
        Ok(())
    }

    fn discard(&mut self) {
        if !self.pending.is_empty() {
            debug!("discard: dropping {} pending deployment(s)", self.pending.len());
        }
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn deployment(name: &str, tenant: Option<&str>, minute: u32) -> Deployment {
        let mut d = Deployment::new(name);
        d.tenant_id = tenant.map(str::to_string);
        d.version = 1;
        d.is_new = true;
        d.deployed_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap();
        d
    }

    #[test]
    fn inserts_are_visible_before_flush_and_lost_on_discard() {
        let mut store = InMemoryDeploymentStore::new();
        let mut d = deployment("orders", None, 0);
        let id = store.insert(&mut d).unwrap();
        assert_eq!(d.id, Some(id));
        assert!(store.find_by_id(id).unwrap().is_some());
        assert!(store.committed().is_empty());

        store.discard();
        assert!(store.find_by_id(id).unwrap().is_none());
    }

    #[test]
    fn reads_return_rehydrated_copies() {
        let mut store = InMemoryDeploymentStore::new();
        let mut d = deployment("orders", None, 0);
        store.insert(&mut d).unwrap();
        store.flush().unwrap();
        let found = store.find_latest_by_name("orders").unwrap().unwrap();
        assert!(!found.is_new);
        assert_eq!(store.committed().len(), 1);
    }

    #[test]
    fn latest_by_name_ignores_tenanted_rows_and_prefers_newest() {
        let mut store = InMemoryDeploymentStore::new();
        let mut old = deployment("orders", None, 0);
        let mut newer = deployment("orders", Some(""), 5);
        let mut tenanted = deployment("orders", Some("acme"), 9);
        store.insert(&mut old).unwrap();
        let newer_id = store.insert(&mut newer).unwrap();
        store.insert(&mut tenanted).unwrap();
        store.flush().unwrap();

        let latest = store.find_latest_by_name("orders").unwrap().unwrap();
        assert_eq!(latest.id, Some(newer_id));
    }

    #[test]
    fn by_name_and_tenant_orders_by_id_descending() {
        let mut store = InMemoryDeploymentStore::new();
        // una inserción posterior con timestamp anterior: el orden por id debe ganar
        let mut first = deployment("orders", Some("acme"), 30);
        let mut second = deployment("orders", Some("acme"), 10);
        let first_id = store.insert(&mut first).unwrap();
        let second_id = store.insert(&mut second).unwrap();

        let found = store.find_by_name_and_tenant("orders", "acme").unwrap();
        let ids: Vec<_> = found.iter().map(|d| d.id.unwrap()).collect();
        assert_eq!(ids, vec![second_id, first_id]);
        assert!(store.find_by_name_and_tenant("orders", "other").unwrap().is_empty());
    }
}
