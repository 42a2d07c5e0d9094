//! Definiciones de proceso compiladas desde los recursos de un deployment.
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DeploymentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuspensionState {
    Active,
    Suspended,
}

impl fmt::Display for SuspensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuspensionState::Active => f.write_str("active"),
            SuspensionState::Suspended => f.write_str("suspended"),
        }
    }
}

/// Definición perteneciente al deployment que la produjo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    /// `key:version:deploymentId`
    pub id: String,
    pub key: String,
    pub name: String,
    pub version: i32,
    pub deployment_id: DeploymentId,
    pub tenant_id: Option<String>,
    pub resource_name: String,
    /// Digest blake3 (hex) del recurso fuente.
    pub resource_digest: String,
    pub suspension_state: SuspensionState,
}

impl ProcessDefinition {
    pub fn compose_id(key: &str, version: i32, deployment_id: DeploymentId) -> String {
        format!("{key}:{version}:{deployment_id}")
    }

    pub fn is_suspended(&self) -> bool {
        self.suspension_state == SuspensionState::Suspended
    }
}
