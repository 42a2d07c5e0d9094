//! Contrato del store de deployments e implementación en memoria.
//!
//! El store es la unidad de persistencia de una transacción de admisión:
//! `insert` deja el deployment visible para toda lectura posterior sobre el
//! mismo store (los compiladores de esa admisión lo ven), y la durabilidad
//! se difiere hasta `flush`. `discard` descarta lo insertado desde el último
//! flush. Todo deployment devuelto por una lectura es una copia rehidratada
//! con `is_new == false`.

mod memory;

pub use memory::InMemoryDeploymentStore;

use crate::errors::Result;
use crate::model::{Deployment, DeploymentId};

pub trait DeploymentStore {
    /// Deployment sin tenant más reciente con este nombre.
    fn find_latest_by_name(&self, name: &str) -> Result<Option<Deployment>>;

    /// Todos los deployments con este nombre y tenant, por id descendente.
    fn find_by_name_and_tenant(&self, name: &str, tenant_id: &str) -> Result<Vec<Deployment>>;

    fn find_by_id(&self, id: DeploymentId) -> Result<Option<Deployment>>;

    /// Asigna el id al deployment y lo registra en la unidad de trabajo
    /// actual.
    fn insert(&mut self, deployment: &mut Deployment) -> Result<DeploymentId>;

    /// Hace durables todas las inserciones pendientes.
    fn flush(&mut self) -> Result<()>;

    /// Descarta todas las inserciones pendientes.
    fn discard(&mut self);
}
