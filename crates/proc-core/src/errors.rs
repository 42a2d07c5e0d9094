//! Errores del núcleo del repositorio.
//!
//! Cada fallo se limita a un intento de admisión. Ninguno es fatal para el
//! proceso; el llamador decide si reintenta.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CoreError {
    #[error("invalid deployment bundle: {0}")] InvalidBundle(String),
    #[error("duplicate resource name in bundle: {0}")] DuplicateResource(String),
    #[error("deployment store error: {0}")] Storage(String),
    #[error("event dispatch failed: {0}")] Dispatch(String),
    #[error("compilation of resource '{resource}' failed: {reason}")] Compilation { resource: String, reason: String },
    #[error("process definition not found: {0}")] DefinitionNotFound(String),
    #[error("process definition {definition_id} is already {state}")] InvalidStateTransition { definition_id: String, state: String },
    #[error("internal: {0}")] Internal(String),
}

/// Alias de `Result` usado en todo el núcleo.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compilation_error_names_the_resource() {
        let err = CoreError::Compilation { resource: "order.bpmn".into(),
                                           reason: "empty content".into() };
        assert_eq!(err.to_string(), "compilation of resource 'order.bpmn' failed: empty content");
    }

    #[test]
    fn state_transition_error_format() {
        let err = CoreError::InvalidStateTransition { definition_id: "order:1:7".into(),
                                                      state: "suspended".into() };
        assert_eq!(err.to_string(), "process definition order:1:7 is already suspended");
    }
}
