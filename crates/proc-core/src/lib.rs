//! Núcleo del repositorio de definiciones de proceso.
//!
//! Admisión de deployments (resolución de duplicados, asignación de versión,
//! programación de activación) sobre traits de colaboradores acotados, más
//! colaboradores en memoria y la fachada `RepositoryService` que los posee.

pub mod admission;
pub mod builder;
pub mod clock;
pub mod command;
pub mod constants;
pub mod deploy;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod service;
pub mod store;

pub use admission::{Admission, AdmissionContext, DeployCommand, Resolution};
pub use builder::{DeploymentBuilder, DeploymentRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use command::{AdminCommand, CommandChannel, InMemoryCommandChannel, TimerJob};
pub use deploy::{DefinitionCache, DeploymentManager, DeploymentSettings, ProcessDeployer};
pub use errors::{CoreError, Result};
pub use event::{EntityEvent, EntityEventKind, EventDispatcher, InMemoryEventDispatcher, LogEventDispatcher};
pub use model::{Deployment, DeploymentId, ProcessDefinition, ReleaseManifest, Resource, SuspensionState,
                VersionSignal};
pub use service::RepositoryService;
pub use store::{DeploymentStore, InMemoryDeploymentStore};
