// [libs/domain/models-rs/src/errors.rs]
/*!
 * =================================================================
 * APARATO: SCHEMA ERROR CATALOG (V4.0 - SOBERANO)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE CANONICALIZACIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PANOPTICON COMPLIANCE: Prefijos de estrato en los mensajes para
 *    su renderizado cromático en el Dashboard.
 * 2. HTTP AGNOSTIC: El catálogo no conoce códigos de estado; solo la
 *    superficie HTTP del Colector los traduce.
 * =================================================================
 */

use thiserror::Error;

/// Catálogo de fallos de validación del registro de interacción entrante.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Un campo obligatorio del productor está ausente.
    #[error("[L2_SCHEMA_FAULT]: MISSING_REQUIRED_FIELD -> {0}")]
    MissingField(&'static str),

    /// Un campo obligatorio llegó presente pero vacío tras el recorte.
    #[error("[L2_SCHEMA_FAULT]: EMPTY_REQUIRED_FIELD -> {0}")]
    EmptyField(&'static str),

    /// La marca temporal del productor no es ISO-8601 interpretable.
    #[error("[L2_SCHEMA_FAULT]: TIMESTAMP_UNPARSEABLE -> {0}")]
    InvalidTimestamp(String),

    /// Un campo de texto excede su cota máxima de longitud.
    #[error("[L2_SCHEMA_FAULT]: FIELD_LENGTH_EXCEEDED -> {field} ({actual} > {max})")]
    FieldTooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    /// El payload opaco serializado supera la cota de 64 KiB.
    #[error("[L2_SCHEMA_FAULT]: PAYLOAD_TOO_LARGE -> {actual} > {max} bytes")]
    PayloadTooLarge { actual: usize, max: usize },
}

impl SchemaError {
    /// Nombre estable del tipo de fallo para el sobre de error JSON y métricas.
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaError::MissingField(_)
            | SchemaError::EmptyField(_)
            | SchemaError::InvalidTimestamp(_)
            | SchemaError::FieldTooLong { .. } => "SchemaError",
            SchemaError::PayloadTooLarge { .. } => "PayloadTooLarge",
        }
    }
}
