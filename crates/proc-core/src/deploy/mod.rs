//! Compilación de artefactos: el contrato `DeploymentManager`, el paquete de
//! settings que recibe y el `ProcessDeployer` de referencia con su caché de
//! definiciones.

mod cache;
mod deployer;
mod settings;

pub use cache::DefinitionCache;
pub use deployer::{process_key, DeploymentManager, ProcessDeployer};
pub use settings::DeploymentSettings;
