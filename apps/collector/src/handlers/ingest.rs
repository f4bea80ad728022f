// [apps/collector/src/handlers/ingest.rs]
/*!
 * =================================================================
 * APARATO: INGESTION GATEWAY (V12.0 - PIPELINE AUTHORITY)
 * CLASIFICACIÓN: API ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: ORQUESTACIÓN CANONICALIZE -> ENRICH -> SCORE -> PERSIST
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. IDEMPOTENT ACK: El reintento de un productor produce la misma
 *    huella y responde duplicate=true sin segunda fila.
 * 2. NEVER-STALL ENRICHMENT: El enriquecedor degrada internamente;
 *    esta superficie solo contabiliza el resultado.
 * 3. HONEST BACKPRESSURE: Cola de escritura llena = 503 + Retry-After;
 *    el productor reintenta con seguridad de deduplicación.
 * 4. DURABILITY: El 200 solo se emite tras el commit confirmado por
 *    el daemon escritor.
 * =================================================================
 */

use crate::handlers::ErrorEnvelope;
use crate::services::WriteCommand;
use crate::state::{AppState, IngestMetrics};
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use senuelo_domain_models::{
    canonicalize, content_hash_hex, GeoStatus, RawEvent, SchemaError, ScoreVerdict,
};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, instrument, warn};

/// Sugerencia de reintento emitida bajo backpressure (segundos).
const RETRY_AFTER_SECONDS: &str = "2";

/// Resumen del veredicto devuelto al productor (puede registrarlo).
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub value: f64,
    pub band: String,
    pub is_anomaly: bool,
    pub predicted_class: String,
    pub traffic_class: String,
}

impl From<&ScoreVerdict> for ScoreSummary {
    fn from(verdict: &ScoreVerdict) -> Self {
        Self {
            value: verdict.value,
            band: verdict.band.as_str().to_string(),
            is_anomaly: verdict.is_anomaly,
            predicted_class: verdict.predicted_class.as_str().to_string(),
            traffic_class: verdict.traffic_class.clone(),
        }
    }
}

/// Acuse de recibo de la ingesta.
#[derive(Debug, Clone, Serialize)]
pub struct IngestAcknowledgment {
    pub accepted: bool,
    pub inserted: bool,
    pub duplicate: bool,
    /// Huella hex de 64 caracteres para correlación de reintentos.
    pub content_hash: String,
    pub score: ScoreSummary,
    pub geo_country: Option<String>,
}

/**
 * Endpoint: POST /ingest (alias histórico: POST /log)
 *
 * Receptor universal de registros de interacción de los frontales.
 */
#[instrument(skip(application_state, raw_event))]
pub async fn handle_event_ingestion(
    State(application_state): State<AppState>,
    Json(raw_event): Json<RawEvent>,
) -> Response {
    let metrics = &application_state.ingest_metrics;
    let ingested_at = Utc::now();

    // --- FASE 1: CANONICALIZACIÓN (C1) ---
    let event = match canonicalize(raw_event, ingested_at) {
        Ok(event) => event,
        Err(schema_fault) => {
            let status = match &schema_fault {
                SchemaError::PayloadTooLarge { .. } => {
                    IngestMetrics::bump(&metrics.payload_rejected);
                    StatusCode::PAYLOAD_TOO_LARGE
                }
                _ => {
                    IngestMetrics::bump(&metrics.schema_rejected);
                    StatusCode::BAD_REQUEST
                }
            };
            warn!("🚫 [INGEST]: Record rejected: {}", schema_fault);
            return (
                status,
                Json(ErrorEnvelope::new(schema_fault.kind(), schema_fault.to_string())),
            )
                .into_response();
        }
    };

    // --- FASE 2: HUELLA DE CONTENIDO ---
    let content_hash = content_hash_hex(&event);

    // --- FASE 3: ENRIQUECIMIENTO GEOGRÁFICO (C2, never-stall) ---
    let geo = application_state.geo_enricher.enrich(&event.source_address).await;
    if geo.status == GeoStatus::Unresolved {
        IngestMetrics::bump(&metrics.enrichment_unavailable);
    }

    // --- FASE 4: VEREDICTO DEL ENSAMBLE (C3/C4) ---
    let score = application_state.ensemble_engine.score(&event, &geo);
    if score.scoring_degraded {
        IngestMetrics::bump(&metrics.scoring_degraded);
    }

    // --- FASE 5: PERSISTENCIA DURADERA (C5, escritor único) ---
    let (ack_sender, ack_receiver) = oneshot::channel();
    let command = WriteCommand {
        content_hash: content_hash.clone(),
        event,
        geo: geo.clone(),
        score: score.clone(),
        ack: ack_sender,
    };

    if let Err(dispatch_fault) = application_state.write_pipeline.try_send(command) {
        return match dispatch_fault {
            mpsc::error::TrySendError::Full(_) => {
                IngestMetrics::bump(&metrics.backpressure_rejected);
                warn!("🌊 [INGEST]: Write queue saturated, shedding with 503.");
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static(RETRY_AFTER_SECONDS));
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    headers,
                    Json(ErrorEnvelope::new(
                        "StoreTransient",
                        "write queue above high watermark, retry later",
                    )),
                )
                    .into_response()
            }
            mpsc::error::TrySendError::Closed(_) => {
                IngestMetrics::bump(&metrics.store_fatal);
                error!("💀 [INGEST]: Write pipeline channel closed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorEnvelope::new("StoreFatal", "write pipeline unavailable")),
                )
                    .into_response()
            }
        };
    }

    match ack_receiver.await {
        Ok(Ok(inserted)) => {
            if inserted {
                IngestMetrics::bump(&metrics.ingested_ok);
            } else {
                IngestMetrics::bump(&metrics.deduplicated);
            }
            info!(
                inserted,
                band = %score.band.as_str(),
                value = score.value,
                "📥 [INGEST]: Event acknowledged."
            );
            (
                StatusCode::OK,
                Json(IngestAcknowledgment {
                    accepted: true,
                    inserted,
                    duplicate: !inserted,
                    content_hash,
                    score: ScoreSummary::from(&score),
                    geo_country: geo.country,
                }),
            )
                .into_response()
        }
        Ok(Err(store_fault)) => {
            if store_fault.is_fatal() {
                IngestMetrics::bump(&metrics.store_fatal);
                error!("💀 [INGEST]: Ledger structural fault: {}", store_fault);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorEnvelope::new("StoreFatal", store_fault.to_string())),
                )
                    .into_response()
            } else {
                IngestMetrics::bump(&metrics.store_transient);
                warn!("⚠️ [INGEST]: Transient store fault surfaced: {}", store_fault);
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static(RETRY_AFTER_SECONDS));
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    headers,
                    Json(ErrorEnvelope::new("StoreTransient", store_fault.to_string())),
                )
                    .into_response()
            }
        }
        Err(_ack_dropped) => {
            IngestMetrics::bump(&metrics.store_fatal);
            error!("💀 [INGEST]: Writer daemon dropped the acknowledgment channel.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope::new("StoreFatal", "persistence acknowledgment lost")),
            )
                .into_response()
        }
    }
}
