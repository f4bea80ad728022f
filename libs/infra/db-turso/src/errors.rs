// [libs/infra/db-turso/src/errors.rs]
/*!
 * =================================================================
 * APARATO: DATABASE ERROR CATALOG (V9.0 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: CATALOGACIÓN SEMÁNTICA DE FALLOS DE PERSISTENCIA
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. TRANSIENT AWARENESS: Distingue fallos transitorios del motor
 *    (busy/locked, reintentables) de colapsos estructurales del
 *    esquema, para que la superficie HTTP traduzca 503 vs 500.
 * 2. PANOPTICON COMPLIANCE: Prefijos de estrato en los mensajes para
 *    su renderizado cromático en el Dashboard.
 * =================================================================
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Error de enlace físico o de red con el motor libSQL.
    #[error("[L3_DB_NET_FAULT]: DATABASE_UPLINK_SEVERED -> {0}")]
    ConnectionError(String),

    /// Error de sintaxis o ejecución devuelto por el motor.
    #[error("[L3_DB_QUERY_FAULT]: SQL_QUERY_REJECTED -> {0}")]
    QueryError(#[from] libsql::Error),

    /// Fallo en la transformación de tipos entre SQLite y el Dominio Rust.
    #[error("[L3_DB_MAPPING_FAULT]: DATA_MAPPING_VIOLATION -> {0}")]
    MappingError(String),

    /// Colapso estructural: tabla ausente o esquema corrupto.
    #[error("[L3_DB_SCHEMA_FAULT]: LEDGER_STRUCTURE_COLLAPSE -> {0}")]
    SchemaFault(String),

    /// La dirección investigada no tiene filas en el Ledger.
    #[error("[L3_DB_FAULT]: SOURCE_NOT_FOUND")]
    SourceNotFound,
}

impl DbError {
    /// Un fallo transitorio del motor admite exactamente un reintento
    /// interno antes de aflorar como 503 al productor.
    pub fn is_transient(&self) -> bool {
        match self {
            DbError::QueryError(fault) => {
                let message = fault.to_string().to_lowercase();
                message.contains("busy") || message.contains("locked")
            }
            DbError::ConnectionError(_) => true,
            _ => false,
        }
    }

    /// Un colapso estructural se reporta como 500; el proceso sigue
    /// vivo para lecturas.
    pub fn is_fatal(&self) -> bool {
        match self {
            DbError::SchemaFault(_) => true,
            DbError::QueryError(fault) => {
                let message = fault.to_string().to_lowercase();
                message.contains("no such table") || message.contains("malformed")
            }
            _ => false,
        }
    }

    /// Nombre estable del tipo de fallo para el sobre de error y métricas.
    pub fn kind(&self) -> &'static str {
        if let DbError::SourceNotFound = self {
            return "NotFound";
        }
        if self.is_fatal() {
            "StoreFatal"
        } else {
            "StoreTransient"
        }
    }
}
