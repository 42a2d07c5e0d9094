use chrono::{DateTime, Utc};
use log::{debug, warn};
use uuid::Uuid;

use super::{AdminCommand, CommandChannel};
use crate::deploy::DefinitionCache;
use crate::errors::{CoreError, Result};

/// Comando con fecha esperando su momento de disparo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerJob {
    pub id: Uuid,
    pub command: AdminCommand,
    pub due_at: DateTime<Utc>,
}

/// Aplica comandos sobre un `DefinitionCache` compartido y guarda los que
/// tienen fecha como timer jobs hasta que `run_due_jobs` los dispara.
#[derive(Debug, Default)]
pub struct InMemoryCommandChannel {
    cache: DefinitionCache,
    log: Vec<AdminCommand>,
    jobs: Vec<TimerJob>,
}

impl InMemoryCommandChannel {
    pub fn new(cache: DefinitionCache) -> Self {
        Self { cache,
               log: Vec::new(),
               jobs: Vec::new() }
    }

    /// Cada comando aceptado, en orden de ejecución.
    pub fn log(&self) -> &[AdminCommand] {
        &self.log
    }

    /// Timer jobs aún no disparados, en orden de programación.
    pub fn jobs(&self) -> &[TimerJob] {
        &self.jobs
    }

    fn apply(&self, command: &AdminCommand) -> Result<()> {
        let updated = self.cache.transition(command.definition_id(), command.target_state())?;
        debug!("command: definition {} is now {}", updated.id, updated.suspension_state);
        Ok(())
    }

    /// Dispara cada job con vencimiento en o antes de `now`, el más antiguo
    /// primero. Los jobs cuya definición ya no existe o ya está en el estado
    /// destino se descartan con un warning. Devuelve cuántos jobs se aplicaron.
    pub fn run_due_jobs(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let (mut due, pending): (Vec<TimerJob>, Vec<TimerJob>) =
            std::mem::take(&mut self.jobs).into_iter().partition(|j| j.due_at <= now);
        self.jobs = pending;
        due.sort_by_key(|j| j.due_at);

        let mut applied = 0;
        for job in due {
            match self.apply(&job.command) {
                Ok(()) => applied += 1,
                Err(e @ (CoreError::DefinitionNotFound(_) | CoreError::InvalidStateTransition { .. })) => {
                    warn!("timer job {} skipped: {e}", job.id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(applied)
    }
}

impl CommandChannel for InMemoryCommandChannel {
    fn execute(&mut self, command: AdminCommand) -> Result<()> {
        if self.cache.get(command.definition_id()).is_none() {
            return Err(CoreError::DefinitionNotFound(command.definition_id().to_string()));
        }
        match command.effective_at() {
            None => self.apply(&command)?,
            Some(due_at) => {
                let job = TimerJob { id: Uuid::new_v4(),
                                     command: command.clone(),
                                     due_at };
                debug!("command: scheduled job {} for {} at {due_at}", job.id, command.definition_id());
                self.jobs.push(job);
            }
        }
        self.log.push(command);
        Ok(())
    }
}
