//! proc-persistence
//!
//! Implementación Postgres del contrato `DeploymentStore` de `proc-core`,
//! más utilidades de conexión, configuración y migraciones.
//!
//! Módulos:
//! - `pg`: `PgDeploymentStore`, proveedores de conexión y construcción del pool.
//! - `migrations`: migraciones Diesel embebidas, una vez por pool.
//! - `config`: parámetros de conexión desde el entorno / `.env`.
//! - `schema`: declaraciones de tablas Diesel.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_pool, ConnectionProvider, PgDeploymentStore, PgPool, PoolProvider};
