//! Servicio del repositorio: posee los colaboradores y envuelve cada admisión
//! en su propia unidad de trabajo.
use std::sync::Arc;

use log::warn;

use crate::admission::{Admission, AdmissionContext, DeployCommand};
use crate::builder::{DeploymentBuilder, DeploymentRequest};
use crate::clock::{Clock, SystemClock};
use crate::command::{CommandChannel, InMemoryCommandChannel};
use crate::deploy::{DefinitionCache, DeploymentManager, ProcessDeployer};
use crate::errors::Result;
use crate::event::{EventDispatcher, InMemoryEventDispatcher};
use crate::model::{Deployment, DeploymentId, ProcessDefinition};
use crate::store::{DeploymentStore, InMemoryDeploymentStore};

pub struct RepositoryService<S, D, C>
    where S: DeploymentStore,
          D: EventDispatcher,
          C: CommandChannel
{
    clock: Arc<dyn Clock>,
    store: S,
    dispatcher: D,
    manager: Box<dyn DeploymentManager>,
    commands: C,
    cache: DefinitionCache,
}

impl RepositoryService<InMemoryDeploymentStore, InMemoryEventDispatcher, InMemoryCommandChannel> {
    /// Servicio completamente en memoria.
    pub fn in_memory() -> Self {
        Self::with_store(InMemoryDeploymentStore::new(), InMemoryEventDispatcher::new())
    }
}

impl<S, D> RepositoryService<S, D, InMemoryCommandChannel>
    where S: DeploymentStore,
          D: EventDispatcher
{
    /// Conecta `store` y `dispatcher` con un `ProcessDeployer` y un canal de
    /// comandos en memoria que comparten una caché de definiciones.
    pub fn with_store(store: S, dispatcher: D) -> Self {
        let cache = DefinitionCache::new();
        Self::new(store,
                  dispatcher,
                  InMemoryCommandChannel::new(cache.clone()),
                  Box::new(ProcessDeployer::new(cache.clone())),
                  cache)
    }

    /// Dispara los timer jobs vencidos a la hora actual del reloj del servicio.
    pub fn run_due_jobs(&mut self) -> Result<usize> {
        let now = self.clock.now();
        self.commands.run_due_jobs(now)
    }
}

impl<S, D, C> RepositoryService<S, D, C>
    where S: DeploymentStore,
          D: EventDispatcher,
          C: CommandChannel
{
    /// `cache` es la caché donde `manager` materializa definiciones; el
    /// servicio lee las definiciones desde ella.
    pub fn new(store: S, dispatcher: D, commands: C, manager: Box<dyn DeploymentManager>, cache: DefinitionCache) -> Self {
        Self { clock: Arc::new(SystemClock),
               store,
               dispatcher,
               manager,
               commands,
               cache }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn create_deployment(&self) -> DeploymentBuilder {
        DeploymentBuilder::new()
    }

    /// Admite `request` en su propia unidad de trabajo: el store hace flush si
    /// la admisión tiene éxito, y ante cualquier fallo se descartan las
    /// inserciones pendientes y las definiciones compiladas del deployment fallido.
    pub fn deploy(&mut self, request: DeploymentRequest) -> Result<Admission> {
        let (outcome, inserted) = {
            let mut ctx = AdmissionContext::new(self.clock.as_ref(),
                                                &mut self.store,
                                                &mut self.dispatcher,
                                                self.manager.as_mut(),
                                                &mut self.commands);
            let outcome = DeployCommand::new(request).execute(&mut ctx);
            (outcome, ctx.inserted)
        };
        let outcome = outcome.and_then(|admission| self.store.flush().map(|()| admission));

        match outcome {
            Ok(Admission::Existing(mut existing)) => {
                if let Some(id) = existing.id {
                    existing.deployed_artifacts = self.cache.for_deployment(id);
                }
                Ok(Admission::Existing(existing))
            }
            Ok(created) => Ok(created),
            Err(e) => {
                warn!("deploy: admission failed, rolling back: {e}");
                self.store.discard();
                if let Some(id) = inserted {
                    self.manager.discard(id);
                }
                Err(e)
            }
        }
    }

    /// Deployment almacenado con sus definiciones compiladas adjuntas.
    pub fn get_deployment(&self, id: DeploymentId) -> Result<Option<Deployment>> {
        Ok(self.store.find_by_id(id)?.map(|mut d| {
                                             d.deployed_artifacts = self.cache.for_deployment(id);
                                             d
                                         }))
    }

    pub fn process_definition(&self, id: &str) -> Option<ProcessDefinition> {
        self.cache.get(id)
    }

    pub fn process_definitions_for(&self, deployment_id: DeploymentId) -> Vec<ProcessDefinition> {
        self.cache.for_deployment(deployment_id)
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }

    pub fn commands(&self) -> &C {
        &self.commands
    }
}
