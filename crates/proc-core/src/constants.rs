//! Constantes compartidas por el núcleo de admisión y sus colaboradores.
//!
//! Las claves de settings forman parte del contrato con los compiladores de
//! artefactos: una implementación de `DeploymentManager` las lee desde
//! `DeploymentSettings` exactamente con estos nombres.

/// Valor centinela de tenant que significa "sin tenant". Un deployment cuyo
/// tenant es `None` o igual a este valor pertenece al linaje compartido.
pub const NO_TENANT_ID: &str = "";

/// Clave de settings: si la validación XSD de BPMN 2.0 corre al compilar.
pub const IS_BPMN20_XSD_VALIDATION_ENABLED: &str = "isBpmn20XsdValidationEnabled";

/// Clave de settings: si la validación de procesos corre al compilar.
pub const IS_PROCESS_VALIDATION_ENABLED: &str = "isProcessValidationEnabled";

/// Sufijos de nombre de recurso que el deployer de referencia compila.
/// El más largo primero, para que la clave quite `.bpmn20.xml` entero.
pub const PROCESS_RESOURCE_SUFFIXES: [&str; 2] = [".bpmn20.xml", ".bpmn"];
