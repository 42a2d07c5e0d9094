//! Activación diferida de definiciones recién compiladas.
use chrono::{DateTime, Utc};
use log::debug;

use crate::command::{AdminCommand, CommandChannel};
use crate::errors::Result;
use crate::model::Deployment;

/// Suspende de inmediato cada definición de `deployment` y programa su
/// activación para `activate_at`, ambos con el tenant del deployment.
/// Cada definición se suspende antes de programar su activación.
/// Devuelve cuántas definiciones se procesaron.
pub fn schedule(commands: &mut dyn CommandChannel,
                deployment: &Deployment,
                activate_at: DateTime<Utc>)
                -> Result<usize> {
    for definition in deployment.process_definitions() {
        commands.execute(AdminCommand::suspend(&definition.id, deployment.tenant_id.clone()))?;
        commands.execute(AdminCommand::activate_at(&definition.id, deployment.tenant_id.clone(), activate_at))?;
        debug!("activation: {} suspended until {activate_at}", definition.id);
    }
    Ok(deployment.process_definitions().len())
}
