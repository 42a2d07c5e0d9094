//! Canal de comandos administrativos.
//!
//! Los comandos de suspensión y activación apuntan a una definición de
//! proceso. Sin fecha efectiva se aplican de inmediato; con fecha quedan como
//! timer job y solo surten efecto cuando un scheduler externo los dispara.

mod memory;

pub use memory::{InMemoryCommandChannel, TimerJob};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::SuspensionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminCommand {
    Suspend {
        definition_id: String,
        tenant_id: Option<String>,
        include_instances: bool,
        effective_at: Option<DateTime<Utc>>,
    },
    Activate {
        definition_id: String,
        tenant_id: Option<String>,
        include_instances: bool,
        effective_at: Option<DateTime<Utc>>,
    },
}

impl AdminCommand {
    pub fn suspend(definition_id: impl Into<String>, tenant_id: Option<String>) -> Self {
        AdminCommand::Suspend { definition_id: definition_id.into(),
                                tenant_id,
                                include_instances: false,
                                effective_at: None }
    }

    pub fn activate_at(definition_id: impl Into<String>,
                       tenant_id: Option<String>,
                       effective_at: DateTime<Utc>)
                       -> Self {
        AdminCommand::Activate { definition_id: definition_id.into(),
                                 tenant_id,
                                 include_instances: false,
                                 effective_at: Some(effective_at) }
    }

    pub fn definition_id(&self) -> &str {
        match self {
            AdminCommand::Suspend { definition_id, .. } | AdminCommand::Activate { definition_id, .. } => definition_id,
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            AdminCommand::Suspend { tenant_id, .. } | AdminCommand::Activate { tenant_id, .. } => tenant_id.as_deref(),
        }
    }

    pub fn effective_at(&self) -> Option<DateTime<Utc>> {
        match self {
            AdminCommand::Suspend { effective_at, .. } | AdminCommand::Activate { effective_at, .. } => *effective_at,
        }
    }

    /// Estado al que el comando mueve su definición.
    pub fn target_state(&self) -> SuspensionState {
        match self {
            AdminCommand::Suspend { .. } => SuspensionState::Suspended,
            AdminCommand::Activate { .. } => SuspensionState::Active,
        }
    }
}

pub trait CommandChannel {
    fn execute(&mut self, command: AdminCommand) -> Result<()>;
}
