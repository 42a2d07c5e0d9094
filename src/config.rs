//! Configuración de la aplicación.
//! Lee `.env` una vez y luego variables de entorno. La sección de base de
//! datos es opcional: sin `DATABASE_URL` la aplicación corre sobre
//! colaboradores en memoria.

use std::env;

use proc_persistence::{init_dotenv, DbConfig};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` cuando `DATABASE_URL` no está definida.
    pub database: Option<DbConfig>,
    /// `PROCFLOW_EVENTS_ENABLED`, activado por defecto.
    pub events_enabled: bool,
    /// `PROCFLOW_DUPLICATE_FILTER`, desactivado por defecto. El flag de la CLI
    /// solo puede activarlo.
    pub duplicate_filter_default: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { database: None,
               events_enabled: true,
               duplicate_filter_default: false }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        init_dotenv();
        let database = DbConfig::from_env_opt().map_err(|e| AppError::Config(e.to_string()))?;
        let events_enabled = parse_flag("PROCFLOW_EVENTS_ENABLED", env::var("PROCFLOW_EVENTS_ENABLED").ok(), true)?;
        let duplicate_filter_default =
            parse_flag("PROCFLOW_DUPLICATE_FILTER", env::var("PROCFLOW_DUPLICATE_FILTER").ok(), false)?;
        Ok(Self { database,
                  events_enabled,
                  duplicate_filter_default })
    }
}

/// Acepta `1/0`, `true/false`, `yes/no`, `on/off` (sin distinguir mayúsculas).
/// Sin definir o en blanco equivale a `default`.
pub fn parse_flag(var: &str, raw: Option<String>, default: bool) -> Result<bool, AppError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config(format!("{var} must be a boolean (got '{raw}')"))),
    }
}
