// INICIO DEL ARCHIVO [apps/collector/src/handlers/mod.rs]
/*!
 * =================================================================
 * APARATO: HANDLER ORCHESTRATION HUB (V8.0 - COLLECTOR MATRIX)
 * CLASIFICACIÓN: APPLICATION ADAPTERS (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE PUNTOS DE ENTRADA (HANDLERS)
 *
 * # Topología de Módulos:
 * - ingest: Recepción, canonicalización y despacho del pipeline C2->C5.
 * - query:  Superficie de lectura del Panóptico (eventos, analítica,
 *           mapa, inteligencia, alertas, investigación).
 * - health: Sonda de vida con estado por componente y contadores.
 * =================================================================
 */

pub mod health;
pub mod ingest;
pub mod query;

use serde::Serialize;

/// Sobre de error JSON uniforme de la superficie HTTP.
/// Solo este estrato traduce tipos de fallo a códigos de estado.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub detail: String,
}

impl ErrorEnvelope {
    pub fn new(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { error: kind.into(), detail: detail.into() }
    }
}
// FIN DEL ARCHIVO [apps/collector/src/handlers/mod.rs]
