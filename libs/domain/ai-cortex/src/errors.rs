// [libs/domain/ai-cortex/src/errors.rs]
/*!
 * =================================================================
 * APARATO: COGNITIVE ERROR CATALOG (V3.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L9)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE INFERENCIA
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CortexError {
    /// El artefacto no pudo leerse del disco en el arranque.
    #[error("[L9_CORTEX_FAULT]: ARTIFACT_UNREADABLE -> {path}: {source}")]
    ArtifactUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// El artefacto no es JSON interpretable según el contrato.
    #[error("[L9_CORTEX_FAULT]: ARTIFACT_MALFORMED -> {path}: {detail}")]
    ArtifactMalformed { path: String, detail: String },

    /// El artefacto declara un kind distinto al esperado para su ranura.
    #[error("[L9_CORTEX_FAULT]: ARTIFACT_KIND_MISMATCH -> {path}: expected {expected}, found {found}")]
    KindMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// Los parámetros del modelo no casan con su lista de columnas.
    #[error("[L9_CORTEX_FAULT]: PARAMETER_SHAPE_MISMATCH -> {detail}")]
    ShapeMismatch { detail: String },

    /// Un modelo individual no pudo ejecutarse sobre el vector de entrada.
    /// El ensamble degrada: el componente aporta cero y el evento persiste.
    #[error("[L9_CORTEX_FAULT]: INFERENCE_COLLAPSE -> {model}: {detail}")]
    InferenceFault { model: &'static str, detail: String },

    /// Los pesos del ensamble no suman la unidad.
    #[error("[L9_CORTEX_FAULT]: WEIGHT_SUM_VIOLATION -> {actual}")]
    WeightSumViolation { actual: f64 },
}
