//! Conexión entre la configuración, la línea de comandos y el servicio del
//! repositorio.
use log::info;
use proc_core::{DeploymentBuilder, DeploymentRequest, DeploymentStore, InMemoryCommandChannel,
                InMemoryDeploymentStore, LogEventDispatcher, RepositoryService};
use proc_persistence::{build_pool, PgDeploymentStore, PoolProvider};
use serde::Serialize;

use crate::bundle;
use crate::cli::DeployArgs;
use crate::config::AppConfig;
use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DefinitionSummary {
    pub id: String,
    pub version: i32,
    pub suspended: bool,
}

/// Lo que imprime la CLI tras una admisión.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeploySummary {
    pub deployment_id: Option<i64>,
    pub name: String,
    pub tenant_id: Option<String>,
    pub version: i32,
    pub duplicate: bool,
    pub definitions: Vec<DefinitionSummary>,
    pub scheduled_jobs: usize,
}

/// Convierte los argumentos de línea de comandos en una solicitud validada.
pub fn build_request(args: &DeployArgs, config: &AppConfig) -> Result<DeploymentRequest, AppError> {
    let resources = match &args.dir {
        Some(dir) => bundle::read_dir(dir)?,
        None => bundle::read_files(&args.file)?,
    };
    if resources.is_empty() {
        return Err(AppError::InvalidArgument("no resources given (use --dir or --file)".into()));
    }

    let mut builder = DeploymentBuilder::new().name(&args.name)
                                              .duplicate_filtering(args.duplicate_filter
                                                                   || config.duplicate_filter_default);
    if let Some(tenant) = &args.tenant {
        builder = builder.tenant_id(tenant);
    }
    for (name, bytes) in resources {
        builder = builder.add_bytes(name, bytes);
    }
    if let Some(version) = args.enforced_version {
        builder = builder.enforced_app_version(version);
    }
    if let Some(manifest) = &args.manifest {
        builder = builder.project_manifest(manifest.clone());
    }
    if let Some(at) = args.activate_at {
        builder = builder.activate_process_definitions_on(at);
    }
    if args.no_schema_validation {
        builder = builder.disable_schema_validation();
    }
    if args.no_process_validation {
        builder = builder.disable_process_validation();
    }
    Ok(builder.build()?)
}

/// Despliega sobre Postgres si hay base de datos configurada; si no, en memoria.
pub fn run_deploy(args: &DeployArgs, config: &AppConfig) -> Result<DeploySummary, AppError> {
    let request = build_request(args, config)?;
    let dispatcher = LogEventDispatcher { enabled: config.events_enabled };
    match &config.database {
        Some(db) => {
            info!("deploy: using Postgres store");
            let pool = build_pool(&db.url, db.min_connections, db.max_connections)?;
            let store = PgDeploymentStore::new(PoolProvider { pool });
            admit(RepositoryService::with_store(store, dispatcher), request)
        }
        None => {
            info!("deploy: DATABASE_URL not set, using in-memory store");
            admit(RepositoryService::with_store(InMemoryDeploymentStore::new(), dispatcher), request)
        }
    }
}

fn admit<S>(mut service: RepositoryService<S, LogEventDispatcher, InMemoryCommandChannel>,
            request: DeploymentRequest)
            -> Result<DeploySummary, AppError>
    where S: DeploymentStore
{
    let admission = service.deploy(request)?;
    let duplicate = admission.is_duplicate();
    let deployment = admission.into_deployment();
    let definitions = deployment.process_definitions()
                                .iter()
                                .map(|p| {
                                    let current = service.process_definition(&p.id).unwrap_or_else(|| p.clone());
                                    DefinitionSummary { id: current.id.clone(),
                                                        version: current.version,
                                                        suspended: current.is_suspended() }
                                })
                                .collect();
    Ok(DeploySummary { deployment_id: deployment.id.map(|id| id.0),
                       name: deployment.name,
                       tenant_id: deployment.tenant_id,
                       version: deployment.version,
                       duplicate,
                       definitions,
                       scheduled_jobs: service.commands().jobs().len() })
}
