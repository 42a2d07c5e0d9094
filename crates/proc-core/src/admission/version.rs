//! Asignación de versión para un candidato que difiere de su linaje.
use log::warn;

use crate::model::{Deployment, VersionSignal};

/// Versión a estampar en un candidato clasificado como distinto de `existing`.
///
/// - forzada: se toma tal cual, aunque no haga avanzar el linaje;
/// - manifiesto: una más que la versión almacenada, o 1 en un linaje nuevo;
/// - sin señal: siempre 1. Sin señal de linaje, el contenido divergente vuelve
///   a 1 en lugar de incrementar.
pub fn assign(candidate: &Deployment, existing: Option<&Deployment>, signal: &VersionSignal) -> i32 {
    match (signal, existing) {
        (VersionSignal::Enforced(version), Some(existing)) => {
            if *version <= existing.version {
                warn!("enforced version {version} for '{}' does not advance stored version {}",
                      candidate.name,
                      existing.version);
            }
            *version
        }
        // un linaje nuevo toma la versión forzada en lugar de empezar en 1
        (VersionSignal::Enforced(version), None) => *version,
        (VersionSignal::Manifest(_), Some(existing)) => existing.version + 1,
        (VersionSignal::Manifest(_), None) | (VersionSignal::None, _) => 1,
    }
}
