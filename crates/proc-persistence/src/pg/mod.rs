//! Implementación Postgres (Diesel) de `DeploymentStore`.
//!
//! Se comporta como `InMemoryDeploymentStore`:
//! - `insert` reserva un id de `deployment_id_seq` y deja el deployment
//!   pendiente; toda lectura combina filas pendientes con las almacenadas.
//! - `flush` escribe todos los deployments pendientes y sus recursos en una
//!   transacción read-write. `discard` los olvida; los ids reservados no se
//!   reutilizan.
//! - La columna tenant guarda `''` para "sin tenant" y se lee como `None`.
//!
//! Los fallos transitorios (conflictos de serialización, errores del pool,
//! conexiones caídas) se reintentan con un backoff corto.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::BigInt;
use log::{debug, warn};
use proc_core::constants::NO_TENANT_ID;
use proc_core::{Deployment, DeploymentId, DeploymentStore, Resource};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{deployment_resources, deployments};

/// Pool r2d2 de conexiones Postgres. Los pools creados con `build_pool` ya
/// están migrados.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Fuente de conexiones, para correr el store sobre un pool real o un doble
/// de test.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// `ConnectionProvider` respaldado por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

#[derive(Queryable, Debug)]
pub struct DeploymentRow {
    pub id: i64,
    pub name: String,
    pub tenant_id: String,
    pub category: Option<String>,
    pub deployment_key: Option<String>,
    pub version: i32,
    pub project_release_version: Option<String>,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Queryable, Debug)]
pub struct ResourceRow {
    pub deployment_id: i64,
    pub name: String,
    pub bytes: Vec<u8>,
    pub generated: bool,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = deployments)]
pub struct NewDeploymentRow<'a> {
    pub id: i64,
    pub name: &'a str,
    pub tenant_id: &'a str,
    pub category: Option<&'a str>,
    pub deployment_key: Option<&'a str>,
    pub version: i32,
    pub project_release_version: Option<&'a str>,
    pub deployed_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = deployment_resources)]
pub struct NewResourceRow<'a> {
    pub deployment_id: i64,
    pub name: &'a str,
    pub bytes: &'a [u8],
    pub generated: bool,
}

const MAX_RETRIES: u32 = 3;

/// Reintenta `f` tras 15ms, 30ms y 45ms mientras falle con un error
/// reintentable.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if e.is_retryable() && attempts < MAX_RETRIES => {
                let delay_ms = 15 * u64::from(attempts + 1);
                warn!("retryable error (attempt {}): {e} -> sleeping {delay_ms}ms", attempts + 1);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

fn rehydrate(deployment: &Deployment) -> Deployment {
    Deployment { is_new: false,
                 deployed_artifacts: Vec::new(),
                 ..deployment.clone() }
}

fn into_deployment(row: DeploymentRow, resources: BTreeMap<String, Resource>) -> Deployment {
    let tenant_id = if row.tenant_id == NO_TENANT_ID { None } else { Some(row.tenant_id) };
    Deployment { id: Some(DeploymentId(row.id)),
                 name: row.name,
                 tenant_id,
                 category: row.category,
                 key: row.deployment_key,
                 resources,
                 version: row.version,
                 project_release_version: row.project_release_version,
                 deployed_at: row.deployed_at,
                 is_new: false,
                 deployed_artifacts: Vec::new() }
}

/// Adjunta los recursos a las filas de deployment, conservando su orden.
fn hydrate(conn: &mut PgConnection, rows: Vec<DeploymentRow>) -> QueryResult<Vec<Deployment>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let resource_rows: Vec<ResourceRow> =
        deployment_resources::table.filter(deployment_resources::deployment_id.eq_any(ids))
                                   .order((deployment_resources::deployment_id.asc(), deployment_resources::name.asc()))
                                   .load(conn)?;
    let mut by_deployment: BTreeMap<i64, BTreeMap<String, Resource>> = BTreeMap::new();
    for r in resource_rows {
        by_deployment.entry(r.deployment_id)
                     .or_default()
                     .insert(r.name.clone(),
                             Resource { name: r.name,
                                        bytes: r.bytes,
                                        generated: r.generated });
    }
    Ok(rows.into_iter()
           .map(|row| {
               let resources = by_deployment.remove(&row.id).unwrap_or_default();
               into_deployment(row, resources)
           })
           .collect())
}

pub struct PgDeploymentStore<P: ConnectionProvider> {
    provider: P,
    pending: Vec<Deployment>,
}

impl<P: ConnectionProvider> PgDeploymentStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider,
               pending: Vec::new() }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn load_rows<F>(&self, query: F) -> Result<Vec<Deployment>, PersistenceError>
        where F: Fn(&mut PgConnection) -> QueryResult<Vec<DeploymentRow>>
    {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            let rows = query(&mut *conn)?;
            hydrate(&mut *conn, rows).map_err(PersistenceError::from)
        })
    }
}

impl<P: ConnectionProvider> DeploymentStore for PgDeploymentStore<P> {
    fn find_latest_by_name(&self, name: &str) -> proc_core::Result<Option<Deployment>> {
        debug!("find_latest_by_name:start name={name}");
        let stored = self.load_rows(|conn| {
                             deployments::table.filter(deployments::name.eq(name))
                                               .filter(deployments::tenant_id.eq(NO_TENANT_ID))
                                               .order((deployments::deployed_at.desc(), deployments::id.desc()))
                                               .limit(1)
                                               .load(conn)
                         })?;
        let pending = self.pending.iter().filter(|d| d.name == name && !d.has_tenant());
        Ok(stored.iter()
                 .chain(pending)
                 .max_by_key(|d| (d.deployed_at, d.id))
                 .map(rehydrate))
    }

    fn find_by_name_and_tenant(&self, name: &str, tenant_id: &str) -> proc_core::Result<Vec<Deployment>> {
        debug!("find_by_name_and_tenant:start name={name} tenant={tenant_id}");
        let stored = self.load_rows(|conn| {
                             deployments::table.filter(deployments::name.eq(name))
                                               .filter(deployments::tenant_id.eq(tenant_id))
                                               .order(deployments::id.desc())
                                               .load(conn)
                         })?;
        let mut found: Vec<Deployment> =
            stored.iter()
                  .chain(self.pending.iter().filter(|d| d.name == name && d.tenant_or_default() == tenant_id))
                  .map(rehydrate)
                  .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(found)
    }

    fn find_by_id(&self, id: DeploymentId) -> proc_core::Result<Option<Deployment>> {
        if let Some(pending) = self.pending.iter().find(|d| d.id == Some(id)) {
            return Ok(Some(rehydrate(pending)));
        }
        let stored = self.load_rows(|conn| deployments::table.filter(deployments::id.eq(id.0)).load(conn))?;
        Ok(stored.into_iter().next())
    }

    fn insert(&mut self, deployment: &mut Deployment) -> proc_core::Result<DeploymentId> {
        let next: i64 = with_retry(|| {
                            let mut conn = self.provider.connection()?;
                            diesel::select(sql::<BigInt>("nextval('deployment_id_seq')")).get_result(&mut conn)
                                                                                       .map_err(PersistenceError::from)
                        })?;
        let id = DeploymentId(next);
        deployment.id = Some(id);
        self.pending.push(rehydrate(deployment));
        debug!("insert: deployment id={id} name={} pending={}", deployment.name, self.pending.len());
        Ok(id)
    }

    fn flush(&mut self) -> proc_core::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        debug!("flush:start pending={}", self.pending.len());
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.build_transaction()
                .read_write()
                .run(|tx_conn| {
                    for (id, d) in self.pending.iter().filter_map(|d| d.id.map(|id| (id, d))) {
                        diesel::insert_into(deployments::table).values(NewDeploymentRow { id: id.0,
                                                                                          name: &d.name,
                                                                                          tenant_id: d.tenant_or_default(),
                                                                                          category: d.category.as_deref(),
                                                                                          deployment_key: d.key.as_deref(),
                                                                                          version: d.version,
                                                                                          project_release_version: d.project_release_version.as_deref(),
                                                                                          deployed_at: d.deployed_at })
                                                               .execute(tx_conn)?;
                        let resources: Vec<NewResourceRow<'_>> =
                            d.resources
                             .values()
                             .map(|r| NewResourceRow { deployment_id: id.0,
                                                       name: &r.name,
                                                       bytes: &r.bytes,
                                                       generated: r.generated })
                             .collect();
                        if !resources.is_empty() {
                            diesel::insert_into(deployment_resources::table).values(&resources)
                                                                            .execute(tx_conn)?;
                        }
                    }
                    Ok::<(), diesel::result::Error>(())
                })
                .map_err(PersistenceError::from)
        })?;
        debug!("flush:done committed={}", self.pending.len());
        self.pending.clear();
        Ok(())
    }

    fn discard(&mut self) {
        if !self.pending.is_empty() {
            debug!("discard: dropping {} pending deployment(s)", self.pending.len());
        }
        self.pending.clear();
    }
}

/// Crea un pool y ejecuta las migraciones pendientes en su primera conexión.
/// Tamaños 0 se elevan a 1 y `min_size` se limita a `max_size`.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("build_pool: min_size > max_size ({validated_min} > {validated_max}), using min=max");
    }
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(validated_min.min(validated_max)))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}
