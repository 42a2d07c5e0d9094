//! procflow
//!
//! Capa de aplicación sobre `proc-core` y `proc-persistence`:
//! - `config`: configuración desde el entorno (`AppConfig`).
//! - `errors`: tipo de error de la aplicación.
//! - `bundle`: lectura de recursos de deployment desde disco.
//! - `cli`: definiciones de línea de comandos.
//! - `app`: arma un `RepositoryService` y ejecuta un deploy.

pub mod app;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod errors;

pub use app::{build_request, run_deploy, DeploySummary};
pub use config::AppConfig;
pub use errors::AppError;
