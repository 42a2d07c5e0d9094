//! Comportamiento del store Postgres. Cada test se omite sin DATABASE_URL.

use chrono::{TimeZone, Utc};
use proc_core::{Deployment, DeploymentStore, Resource};
use proc_persistence::config::DbConfig;
use proc_persistence::pg::{build_pool, PgDeploymentStore, PoolProvider};
use uuid::Uuid;

fn store() -> Option<PgDeploymentStore<PoolProvider>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set: skipping");
        return None;
    }
    let cfg = DbConfig::from_env().expect("db config");
    let pool = build_pool(&cfg.url, 1, 2).expect("pool");
    Some(PgDeploymentStore::new(PoolProvider { pool }))
}

fn unique_name() -> String {
    format!("orders-{}", Uuid::new_v4())
}

fn candidate(name: &str, tenant: Option<&str>, minute: u32) -> Deployment {
    let mut d = Deployment::new(name);
    d.tenant_id = tenant.map(str::to_string);
    d.version = 1;
    d.is_new = true;
    d.deployed_at = Utc.with_ymd_and_hms(2024, 7, 1, 10, minute, 0).unwrap();
    d.resources.insert("order.bpmn".into(), Resource::new("order.bpmn", "<definitions/>"));
    d.resources.insert("order.png".into(), Resource::generated("order.png", vec![0u8, 159, 146, 150]));
    d
}

#[test]
fn flushed_deployment_round_trips_with_resources() {
    let Some(mut store) = store() else { return };
    let name = unique_name();
    let mut d = candidate(&name, None, 0);
    d.project_release_version = Some("1.0.0".into());
    let id = store.insert(&mut d).unwrap();
    store.flush().unwrap();
    assert_eq!(store.pending_len(), 0);

    let loaded = store.find_by_id(id).unwrap().expect("stored row");
    assert!(!loaded.is_new);
    assert_eq!(loaded.tenant_id, None);
    assert_eq!(loaded.project_release_version.as_deref(), Some("1.0.0"));
    assert_eq!(loaded.resources, d.resources);
    assert_eq!(loaded.deployed_at, d.deployed_at);
}

#[test]
fn pending_rows_are_visible_and_discard_drops_them() {
    let Some(mut store) = store() else { return };
    let name = unique_name();
    let mut d = candidate(&name, Some("acme"), 0);
    let id = store.insert(&mut d).unwrap();
    assert_eq!(store.find_by_name_and_tenant(&name, "acme").unwrap().len(), 1);

    store.discard();
    assert!(store.find_by_id(id).unwrap().is_none());
    store.flush().unwrap();
    assert!(store.find_by_name_and_tenant(&name, "acme").unwrap().is_empty());
}

#[test]
fn lookups_follow_lineage_ordering() {
    let Some(mut store) = store() else { return };
    let name = unique_name();
    let mut early = candidate(&name, None, 30);
    let mut late = candidate(&name, None, 45);
    let mut tenanted_a = candidate(&name, Some("acme"), 50);
    let mut tenanted_b = candidate(&name, Some("acme"), 5);
    store.insert(&mut early).unwrap();
    let late_id = store.insert(&mut late).unwrap();
    let a = store.insert(&mut tenanted_a).unwrap();
    let b = store.insert(&mut tenanted_b).unwrap();
    store.flush().unwrap();

    let latest = store.find_latest_by_name(&name).unwrap().unwrap();
    assert_eq!(latest.id, Some(late_id));

    let ids: Vec<_> = store.find_by_name_and_tenant(&name, "acme")
                           .unwrap()
                           .into_iter()
                           .map(|d| d.id.unwrap())
                           .collect();
    assert_eq!(ids, vec![b, a]);
}
