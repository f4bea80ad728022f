// [libs/domain/ai-cortex/src/lib.rs]
/*!
 * =================================================================
 * APARATO: AI CORTEX LIBRARY ROOT (V11.0 - TRIAD VERDICT)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L9)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL ESTRATO COGNITIVO
 *
 * # Topología de Módulos:
 * - artifacts: bóveda inmutable de los tres artefactos entrenados.
 * - features:  proyección determinista evento -> matriz numérica.
 * - ensemble:  mezcla ponderada, piso de indicadores y taxonomía.
 * - errors:    catálogo semántico de fallos de inferencia.
 * =================================================================
 */

pub mod artifacts;
pub mod ensemble;
pub mod errors;
pub mod features;

pub use artifacts::{
    AnomalyArtifact, AnomalyParams, ArtifactSet, Preprocessing, ScalerParams, SecondaryArtifact,
    SecondaryParams, SupervisedArtifact, SupervisedParams, KIND_SECONDARY, KIND_SUPERVISED,
    KIND_UNSUPERVISED,
};
pub use ensemble::{EnsembleEngine, EnsembleWeights, IndicatorPolicy, TRAFFIC_CLASS_UNKNOWN};
pub use errors::CortexError;
pub use features::{featurize, FeatureFrame};
