//! Errores de persistencia.
//! Mapea fallos de Diesel y del pool a un conjunto pequeño de variantes sobre
//! las que el store puede decidir (reintentar o rendirse).

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use proc_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),
    #[error("not found")]
    NotFound,
    #[error("serialization conflict (retryable)")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl PersistenceError {
    /// Merece otro intento tras una pausa corta.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SerializationConflict | Self::TransientIo(_) => true,
            // algunos fallos del driver solo aparecen como texto
            Self::Unknown(msg) => {
                let m = msg.to_lowercase();
                m.contains("deadlock detected")
                || m.contains("could not serialize access")
                || m.contains("terminating connection")
                || m.contains("connection closed")
                || m.contains("connection refused")
                || m.contains("timeout")
            }
            _ => false,
        }
    }
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => Self::UniqueViolation(info.message().to_string()),
                DatabaseErrorKind::CheckViolation => Self::CheckViolation(info.message().to_string()),
                DatabaseErrorKind::ForeignKeyViolation => Self::ForeignKeyViolation(info.message().to_string()),
                DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                DatabaseErrorKind::ClosedConnection => Self::TransientIo(info.message().to_string()),
                other => Self::Unknown(format!("db error kind {other:?}: {}", info.message())),
            },
            DieselError::BrokenTransactionManager => Self::TransientIo("broken transaction manager".into()),
            DieselError::DeserializationError(e) => Self::Unknown(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Unknown(format!("ser: {e}")),
            DieselError::RollbackErrorOnCommit { rollback_error, commit_error } => {
                Self::Unknown(format!("rollback={rollback_error}; commit={commit_error}"))
            }
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<PersistenceError> for CoreError {
    fn from(err: PersistenceError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_are_retryable() {
        assert!(PersistenceError::SerializationConflict.is_retryable());
        assert!(PersistenceError::TransientIo("pool timed out".into()).is_retryable());
        assert!(PersistenceError::Unknown("ERROR: deadlock detected".into()).is_retryable());
        assert!(!PersistenceError::UniqueViolation("deployments_pkey".into()).is_retryable());
        assert!(!PersistenceError::Config("DATABASE_URL is not set".into()).is_retryable());
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        assert!(matches!(PersistenceError::from(DieselError::NotFound), PersistenceError::NotFound));
    }

    #[test]
    fn converts_into_core_storage_error() {
        let core: CoreError = PersistenceError::TransientIo("pool get".into()).into();
        assert_eq!(core, CoreError::Storage("transient IO / connection pool error: pool get".into()));
    }
}
