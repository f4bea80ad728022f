// [libs/domain/models-rs/src/event.rs]
/*!
 * =================================================================
 * APARATO: INTERACTION EVENT CONTRACT (V7.0 - CANONICAL AUTHORITY)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: CANONICALIZACIÓN Y COTAS DEL REGISTRO DE INTERACCIÓN
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. TYPED RECORD: El registro dinámico del productor se proyecta a
 *    una entidad tipada e inmutable tras la canonicalización.
 * 2. OPAQUE PAYLOAD: El interior del payload permanece opaco (blob
 *    serializado con cota de 64 KiB).
 * 3. IDEMPOTENCIA: canonicalizar un evento ya canónico es la identidad.
 * =================================================================
 */

use crate::errors::SchemaError;
use crate::geo::GeoFields;
use crate::score::ScoreVerdict;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cota máxima del payload opaco serializado (64 KiB).
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

const MAX_ADDRESS_LEN: usize = 64;
const MAX_ACTION_LEN: usize = 64;
const MAX_SERVICE_LEN: usize = 64;
const MAX_PROTOCOL_LEN: usize = 16;
const MAX_SESSION_LEN: usize = 128;
const MAX_PATH_LEN: usize = 1024;
const MAX_USER_AGENT_LEN: usize = 1024;

/// Registro crudo tal como lo emite un frontal de decepción.
/// Todos los campos llegan opcionales; la canonicalización decide
/// cuáles son obligatorios.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub observed_at: Option<String>,
    #[serde(default)]
    pub source_address: Option<String>,
    #[serde(default)]
    pub target_service: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub target_path: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Entidad canónica de una interacción de atacante.
/// Inmutable tras su creación: no existe ruta de actualización.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub observed_at: DateTime<Utc>,
    pub ingested_at: DateTime<Utc>,
    pub source_address: String,
    pub protocol: Option<String>,
    pub target_service: String,
    pub action: String,
    pub target_path: Option<String>,
    pub session_id: String,
    pub user_agent: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    /// Payload opaco ya serializado (JSON compacto), cota 64 KiB.
    pub payload_json: Option<String>,
}

impl Event {
    /// Representación de almacenamiento de una marca temporal (UTC, milisegundos).
    pub fn storage_timestamp(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Representación canónica de alta precisión usada por la huella de contenido.
    pub fn hashing_timestamp(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// Fila completa del Ledger devuelta por las consultas de lectura.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    pub content_hash: String,
    pub observed_at: String,
    pub ingested_at: String,
    pub source_address: String,
    pub protocol: Option<String>,
    pub target_service: String,
    pub action: String,
    pub target_path: Option<String>,
    pub session_id: String,
    pub user_agent: Option<String>,
    pub headers: Option<serde_json::Value>,
    pub payload: Option<serde_json::Value>,
    pub geo: GeoFields,
    pub score: ScoreVerdict,
}

/// Valida, recorta y normaliza un registro crudo hacia la entidad canónica.
///
/// Reglas:
/// - `observed_at`, `source_address`, `target_service`, `action` y
///   `session_id` son obligatorios y no vacíos.
/// - `action` y `target_service` se normalizan a minúsculas.
/// - Las marcas temporales se normalizan a UTC.
/// - El payload se serializa una única vez y se rechaza por encima de
///   64 KiB con `SchemaError::PayloadTooLarge`.
pub fn canonicalize(raw: RawEvent, ingested_at: DateTime<Utc>) -> Result<Event, SchemaError> {
    let observed_raw = raw
        .observed_at
        .ok_or(SchemaError::MissingField("observed_at"))?;

    let observed_at = DateTime::parse_from_rfc3339(observed_raw.trim())
        .map_err(|_| SchemaError::InvalidTimestamp(observed_raw.trim().to_string()))?
        .with_timezone(&Utc);

    let source_address = required_trimmed(
        raw.source_address,
        "source_address",
        MAX_ADDRESS_LEN,
    )?;

    let target_service = required_trimmed(raw.target_service, "target_service", MAX_SERVICE_LEN)?
        .to_lowercase();

    let action = required_trimmed(raw.action, "action", MAX_ACTION_LEN)?.to_lowercase();

    let session_id = required_trimmed(raw.session_id, "session_id", MAX_SESSION_LEN)?;

    let protocol = optional_trimmed(raw.protocol, "protocol", MAX_PROTOCOL_LEN)?;
    let target_path = optional_trimmed(raw.target_path, "target_path", MAX_PATH_LEN)?;
    let user_agent = optional_trimmed(raw.user_agent, "user_agent", MAX_USER_AGENT_LEN)?;

    let payload_json = match raw.payload {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => {
            // La serialización de serde_json sobre un Value es infalible.
            let serialized = value.to_string();
            if serialized.len() > MAX_PAYLOAD_BYTES {
                return Err(SchemaError::PayloadTooLarge {
                    actual: serialized.len(),
                    max: MAX_PAYLOAD_BYTES,
                });
            }
            Some(serialized)
        }
    };

    let headers = raw.headers.filter(|map| !map.is_empty());

    Ok(Event {
        observed_at,
        ingested_at,
        source_address,
        protocol,
        target_service,
        action,
        target_path,
        session_id,
        user_agent,
        headers,
        payload_json,
    })
}

fn required_trimmed(
    field: Option<String>,
    name: &'static str,
    max: usize,
) -> Result<String, SchemaError> {
    let value = field.ok_or(SchemaError::MissingField(name))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchemaError::EmptyField(name));
    }
    bound_length(trimmed, name, max)?;
    Ok(trimmed.to_string())
}

fn optional_trimmed(
    field: Option<String>,
    name: &'static str,
    max: usize,
) -> Result<Option<String>, SchemaError> {
    match field {
        None => Ok(None),
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            bound_length(trimmed, name, max)?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn bound_length(value: &str, name: &'static str, max: usize) -> Result<(), SchemaError> {
    if value.len() > max {
        return Err(SchemaError::FieldTooLong {
            field: name,
            actual: value.len(),
            max,
        });
    }
    Ok(())
}
