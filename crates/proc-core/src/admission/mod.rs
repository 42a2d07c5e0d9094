//! Admisión de deployments.
//!
//! Una admisión decide si un deployment enviado es nuevo, un duplicado del
//! último deployment de su linaje (name, tenant) o una actualización de él, y
//! luego ejecuta los efectos en orden:
//!
//! ```text
//! Start -> DuplicateCheck -> Existing                                 (sin escrituras ni eventos)
//!                         -> Persist -> EntityCreated -> Compile
//!                            -> ScheduleActivation? -> EntityInitialized -> Created
//! ```
//!
//! Aquí nada se confirma. El llamador es dueño de la transacción y hace
//! flush o discard del store cuando `DeployCommand::execute` retorna.

pub mod activation;
mod controller;
pub mod resolver;
pub mod version;

pub use controller::{Admission, AdmissionContext, DeployCommand};
pub use resolver::Resolution;
