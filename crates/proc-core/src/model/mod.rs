//! Modelo de dominio: deployments, sus recursos y las definiciones de proceso
//! compiladas a partir de ellos.

pub mod definition;
pub mod deployment;
pub mod metadata;
pub mod resource;

pub use definition::{ProcessDefinition, SuspensionState};
pub use deployment::{Deployment, DeploymentId};
pub use metadata::{ReleaseManifest, VersionSignal};
pub use resource::Resource;
