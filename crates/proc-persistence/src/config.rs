//! Parámetros de conexión desde el entorno.
//! `DATABASE_URL` es obligatoria; los tamaños del pool son opcionales.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

// `.env` se lee como mucho una vez por proceso; si falta no pasa nada.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv();
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        init_dotenv();
        let url = env::var("DATABASE_URL").map_err(|_| PersistenceError::Config("DATABASE_URL is not set".into()))?;
        let min_connections = parse_or("DATABASE_MIN_CONNECTIONS", 2)?;
        let max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 16)?;
        Ok(Self { url,
                  min_connections,
                  max_connections })
    }

    /// `Some` cuando existe `DATABASE_URL`, para que el llamador pueda caer a un
    /// store en memoria.
    pub fn from_env_opt() -> Result<Option<Self>, PersistenceError> {
        init_dotenv();
        if env::var("DATABASE_URL").is_err() {
            return Ok(None);
        }
        Self::from_env().map(Some)
    }
}

fn parse_or(var: &str, default: u32) -> Result<u32, PersistenceError> {
    match env::var(var) {
        Ok(raw) => raw.trim()
                      .parse()
                      .map_err(|_| PersistenceError::Config(format!("{var} must be a positive integer (got '{raw}')"))),
        Err(_) => Ok(default),
    }
}

/// Carga `.env` temprano para aplicaciones que leen otras variables antes.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
