use std::collections::BTreeMap;

use crate::constants::{IS_BPMN20_XSD_VALIDATION_ENABLED, IS_PROCESS_VALIDATION_ENABLED};

/// Las dos opciones con nombre que la admisión entrega al compilador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentSettings {
    pub bpmn20_xsd_validation_enabled: bool,
    pub process_validation_enabled: bool,
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self { bpmn20_xsd_validation_enabled: true,
               process_validation_enabled: true }
    }
}

impl DeploymentSettings {
    /// Settings indexados por su nombre de contrato.
    pub fn as_map(&self) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([(IS_BPMN20_XSD_VALIDATION_ENABLED, self.bpmn20_xsd_validation_enabled),
                        (IS_PROCESS_VALIDATION_ENABLED, self.process_validation_enabled)])
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.as_map().get(key).copied()
    }
}
