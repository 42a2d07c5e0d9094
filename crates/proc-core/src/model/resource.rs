//! Recurso con nombre dentro de un bundle de deployment.
use serde::{Deserialize, Serialize};

/// Contenido crudo del artefacto. Los recursos generados los produce el propio
/// motor (diagramas derivados y similares) y nunca participan en la
/// comparación de duplicados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub bytes: Vec<u8>,
    pub generated: bool,
}

impl Resource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(),
               bytes: bytes.into(),
               generated: false }
    }

    pub fn generated(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { generated: true,
               ..Self::new(name, bytes) }
    }
}
