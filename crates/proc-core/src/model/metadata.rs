//! Metadatos opcionales de versionado que acompañan a una solicitud de deployment.
use serde::{Deserialize, Serialize};

/// Manifiesto de release aportado por el llamador. Su `version` es un string
/// semántico de release, distinto del contador interno de versión del deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseManifest {
    pub name: String,
    pub version: String,
}

impl ReleaseManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(),
               version: version.into() }
    }
}

/// Señal de linaje que guía la resolución de duplicados y la asignación de
/// versión. Precedencia fija: la versión forzada gana al manifiesto y el
/// manifiesto gana a la comparación de contenido.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionSignal {
    Enforced(i32),
    Manifest(String),
    #[default]
    None,
}

impl VersionSignal {
    /// Construye la señal a partir de las entradas opcionales aplicando la precedencia.
    pub fn from_parts(enforced: Option<i32>, manifest: Option<&ReleaseManifest>) -> Self {
        match (enforced, manifest) {
            (Some(v), _) => VersionSignal::Enforced(v),
            (None, Some(m)) => VersionSignal::Manifest(m.version.clone()),
            (None, None) => VersionSignal::None,
        }
    }
}
