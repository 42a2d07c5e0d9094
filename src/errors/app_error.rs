use proc_core::CoreError;
use proc_persistence::PersistenceError;
use thiserror::Error;

/// Errores que expone la capa de aplicación de `procflow`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot read bundle directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("output encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_variant_format() {
        let err = AppError::Config("PROCFLOW_EVENTS_ENABLED must be a boolean".into());
        assert_eq!(err.to_string(), "configuration error: PROCFLOW_EVENTS_ENABLED must be a boolean");
    }

    #[test]
    fn core_errors_pass_through_unchanged() {
        let err: AppError = CoreError::DuplicateResource("a.bpmn".into()).into();
        assert_eq!(err.to_string(), "duplicate resource name in bundle: a.bpmn");
    }

    #[test]
    fn io_variant_from() {
        let err: AppError = std::io::Error::other("disk gone").into();
        assert_eq!(err.to_string(), "I/O error: disk gone");
    }
}
