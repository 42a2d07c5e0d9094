use log::{debug, info};

use super::resolver::{self, Resolution};
use super::{activation, version};
use crate::builder::DeploymentRequest;
use crate::clock::Clock;
use crate::command::CommandChannel;
use crate::deploy::DeploymentManager;
use crate::errors::Result;
use crate::event::{EntityEvent, EventDispatcher};
use crate::model::{Deployment, DeploymentId};
use crate::store::DeploymentStore;

/// Resultado de una admisión.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Se insertó y compiló una fila nueva.
    Created(Deployment),
    /// El filtro de duplicados encontró un deployment almacenado; no se escribió nada.
    Existing(Deployment),
}

impl Admission {
    pub fn deployment(&self) -> &Deployment {
        match self {
            Admission::Created(d) | Admission::Existing(d) => d,
        }
    }

    pub fn into_deployment(self) -> Deployment {
        match self {
            Admission::Created(d) | Admission::Existing(d) => d,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Admission::Existing(_))
    }
}

/// Colaboradores prestados durante una admisión.
pub struct AdmissionContext<'a> {
    pub clock: &'a dyn Clock,
    pub store: &'a mut dyn DeploymentStore,
    pub dispatcher: &'a mut dyn EventDispatcher,
    pub manager: &'a mut dyn DeploymentManager,
    pub commands: &'a mut dyn CommandChannel,
    /// Id entregado por el store en esta admisión, para que el llamador pueda
    /// deshacer el estado derivado si la admisión falla tras la inserción.
    pub inserted: Option<DeploymentId>,
}

impl<'a> AdmissionContext<'a> {
    pub fn new(clock: &'a dyn Clock,
               store: &'a mut dyn DeploymentStore,
               dispatcher: &'a mut dyn EventDispatcher,
               manager: &'a mut dyn DeploymentManager,
               commands: &'a mut dyn CommandChannel)
               -> Self {
        Self { clock,
               store,
               dispatcher,
               manager,
               commands,
               inserted: None }
    }
}

/// Una admisión de un `DeploymentRequest`.
#[derive(Debug, Clone)]
pub struct DeployCommand {
    request: DeploymentRequest,
}

impl DeployCommand {
    pub fn new(request: DeploymentRequest) -> Self {
        Self { request }
    }

    pub fn execute(self, ctx: &mut AdmissionContext<'_>) -> Result<Admission> {
        let signal = self.request.version_signal();
        let settings = self.request.settings();
        let DeploymentRequest { mut deployment,
                                duplicate_filter_enabled,
                                activation_date,
                                manifest,
                                .. } = self.request;

        deployment.deployed_at = ctx.clock.now();
        if let Some(manifest) = &manifest {
            deployment.project_release_version = Some(manifest.version.clone());
        }

        if duplicate_filter_enabled {
            let existing = resolver::find_existing(&*ctx.store, &deployment)?;
            if let Some(found) = &existing {
                if resolver::resolve(&deployment, Some(found), &signal) == Resolution::Identical {
                    info!("admission: '{}' matches deployment {:?} (version {}), nothing to deploy",
                          deployment.name,
                          found.id,
                          found.version);
                    return Ok(Admission::Existing(found.clone()));
                }
            }
            deployment.version = version::assign(&deployment, existing.as_ref(), &signal);
        } else {
            deployment.version = 1;
        }
        deployment.is_new = true;

        let id = ctx.store.insert(&mut deployment)?;
        ctx.inserted = Some(id);
        debug!("admission: inserted '{}' as {id} version {}", deployment.name, deployment.version);

        if ctx.dispatcher.is_enabled() {
            ctx.dispatcher.dispatch(EntityEvent::created(&deployment))?;
        }

        ctx.manager.deploy(&mut deployment, &settings)?;
        debug!("admission: {id} produced {} definition(s)", deployment.process_definitions().len());

        if let Some(activate_at) = activation_date {
            let scheduled = activation::schedule(&mut *ctx.commands, &deployment, activate_at)?;
            debug!("admission: {scheduled} definition(s) of {id} deferred until {activate_at}");
        }

        if ctx.dispatcher.is_enabled() {
            ctx.dispatcher.dispatch(EntityEvent::initialized(&deployment))?;
        }

        info!("admission: deployed '{}' as {id} version {}", deployment.name, deployment.version);
        Ok(Admission::Created(deployment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DeploymentBuilder;
    use crate::clock::FixedClock;
    use crate::command::InMemoryCommandChannel;
    use crate::deploy::{DefinitionCache, DeploymentSettings, ProcessDeployer};
    use crate::errors::CoreError;
    use crate::event::{EntityEventKind, InMemoryEventDispatcher};
    use crate::store::InMemoryDeploymentStore;
    use chrono::{TimeZone, Utc};

    struct Fixture {
        clock: FixedClock,
        store: InMemoryDeploymentStore,
        dispatcher: InMemoryEventDispatcher,
        deployer: ProcessDeployer,
        commands: InMemoryCommandChannel,
    }

    impl Fixture {
        fn new() -> Self {
            let cache = DefinitionCache::new();
            Self { clock: FixedClock::at(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()),
                   store: InMemoryDeploymentStore::new(),
                   dispatcher: InMemoryEventDispatcher::new(),
                   deployer: ProcessDeployer::new(cache.clone()),
                   commands: InMemoryCommandChannel::new(cache) }
        }

        fn admit(&mut self, request: DeploymentRequest) -> Result<Admission> {
            let mut ctx = AdmissionContext::new(&self.clock,
                                                &mut self.store,
                                                &mut self.dispatcher,
                                                &mut self.deployer,
                                                &mut self.commands);
            DeployCommand::new(request).execute(&mut ctx)
        }
    }

    fn orders() -> DeploymentBuilder {
        DeploymentBuilder::new().name("orders")
                                .add_string("order.bpmn", "<definitions/>")
                                .enable_duplicate_filtering()
    }

    #[test]
    fn created_deployment_is_stamped_and_announced() {
        let mut fx = Fixture::new();
        let admission = fx.admit(orders().build().unwrap()).unwrap();
        assert!(!admission.is_duplicate());
        let d = admission.deployment();
        assert_eq!(d.version, 1);
        assert!(d.is_new);
        assert_eq!(d.deployed_at, fx.clock.now());
        assert_eq!(d.process_definitions().len(), 1);
        assert_eq!(fx.dispatcher.kinds(),
                   vec![EntityEventKind::EntityCreated, EntityEventKind::EntityInitialized]);
        // el evento created se emite antes de compilar
        assert!(fx.dispatcher.events()[0].entity.deployed_artifacts.is_empty());
        assert_eq!(fx.dispatcher.events()[1].entity.deployed_artifacts.len(), 1);
    }

    #[test]
    fn identical_resubmission_short_circuits() {
        let mut fx = Fixture::new();
        let first = fx.admit(orders().build().unwrap()).unwrap().into_deployment();
        let second = fx.admit(orders().build().unwrap()).unwrap();
        assert!(second.is_duplicate());
        assert_eq!(second.deployment().id, first.id);
        assert!(!second.deployment().is_new);
        assert_eq!(fx.store.pending_len(), 1);
        assert_eq!(fx.dispatcher.events().len(), 2);
        assert_eq!(fx.deployer.cache().len(), 1);
    }

    #[test]
    fn filtering_disabled_always_inserts_version_one() {
        let mut fx = Fixture::new();
        let request = || orders().duplicate_filtering(false).enforced_app_version(4).build().unwrap();
        let first = fx.admit(request()).unwrap();
        let second = fx.admit(request()).unwrap();
        assert_eq!(first.deployment().version, 1);
        assert_eq!(second.deployment().version, 1);
        assert_ne!(first.deployment().id, second.deployment().id);
    }

    #[test]
    fn manifest_version_is_recorded_on_the_deployment() {
        let mut fx = Fixture::new();
        let request = orders().project_manifest(crate::model::ReleaseManifest::new("orders", "1.0.0"))
                              .build()
                              .unwrap();
        let d = fx.admit(request).unwrap().into_deployment();
        assert_eq!(d.project_release_version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn compilation_failure_propagates_after_insert() {
        let mut fx = Fixture::new();
        let request = DeploymentBuilder::new().name("broken").add_string("bad.bpmn", "").build().unwrap();
        let mut ctx = AdmissionContext::new(&fx.clock,
                                            &mut fx.store,
                                            &mut fx.dispatcher,
                                            &mut fx.deployer,
                                            &mut fx.commands);
        let err = DeployCommand::new(request).execute(&mut ctx).unwrap_err();
        assert!(matches!(err, CoreError::Compilation { .. }));
        assert!(ctx.inserted.is_some());
        assert_eq!(fx.dispatcher.kinds(), vec![EntityEventKind::EntityCreated]);
    }

    #[test]
    fn disabled_dispatcher_gets_no_events() {
        let mut fx = Fixture::new();
        fx.dispatcher.set_enabled(false);
        let admission = fx.admit(orders().build().unwrap()).unwrap();
        assert!(!admission.is_duplicate());
        assert!(fx.dispatcher.events().is_empty());
    }

    #[test]
    fn manager_receives_request_settings() {
        struct Capture(Option<DeploymentSettings>);
        impl DeploymentManager for Capture {
            fn deploy(&mut self, _: &mut Deployment, settings: &DeploymentSettings) -> Result<()> {
                self.0 = Some(*settings);
                Ok(())
            }
        }
        let mut fx = Fixture::new();
        let mut capture = Capture(None);
        let mut ctx = AdmissionContext::new(&fx.clock,
                                            &mut fx.store,
                                            &mut fx.dispatcher,
                                            &mut capture,
                                            &mut fx.commands);
        DeployCommand::new(orders().disable_schema_validation().build().unwrap()).execute(&mut ctx)
                                                                                 .unwrap();
        let settings = capture.0.unwrap();
        assert!(!settings.bpmn20_xsd_validation_enabled);
        assert!(settings.process_validation_enabled);
    }
}
