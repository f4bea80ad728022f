// [apps/collector/src/handlers/query.rs]
/*!
 * =================================================================
 * APARATO: PANOPTICON QUERY SURFACE (V10.0 - READ AUTHORITY)
 * CLASIFICACIÓN: API ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: SUPERFICIE DE LECTURA SOBRE EL LEDGER
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. READ-ONLY: Ningún endpoint de este estrato muta estado ni
 *    bloquea sobre el enriquecedor.
 * 2. GRACEFUL DEGRADATION: Un fallo del motor degrada a listas
 *    vacías y reportes a cero (con sus 24 cubos), nunca a 5xx,
 *    salvo el 404 de investigación y el 400 de parámetros.
 * 3. WINDOW ANCHOR: El ancla temporal es SIEMPRE la hora UTC actual.
 * =================================================================
 */

use crate::handlers::ErrorEnvelope;
use crate::state::{AppState, IngestMetrics};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use senuelo_domain_models::{
    AnalyticsReport, BandHistogram, CountSeriesPoint, DashboardStats, MlInsightsReport,
    ScoreSeriesPoint,
};
use senuelo_infra_db::repositories::event::analytics::{hour_anchor, window_bucket_keys};
use senuelo_infra_db::DbError;
use serde::Deserialize;
use tracing::{error, instrument, warn};

/// Límite por defecto de los listados cuando el consumidor no lo fija.
const DEFAULT_LIST_LIMIT: u64 = 100;
/// Umbral por defecto del feed de alertas.
const DEFAULT_ALERT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Deserialize)]
pub struct LiveEventsParams {
    pub limit: Option<String>,
    pub source: Option<String>,
    pub min_score: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertsParams {
    pub threshold: Option<String>,
    pub limit: Option<String>,
}

/**
 * Endpoint: GET /events
 */
#[instrument(skip(application_state))]
pub async fn handle_live_events(
    State(application_state): State<AppState>,
    Query(params): Query<LiveEventsParams>,
) -> Response {
    let metrics = &application_state.ingest_metrics;

    let limit = match parse_limit(params.limit.as_deref()) {
        Ok(limit) => limit,
        Err(envelope) => {
            IngestMetrics::bump(&metrics.query_param_rejected);
            return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
        }
    };
    let min_score = match parse_bounded_score(params.min_score.as_deref(), "min_score") {
        Ok(score) => score,
        Err(envelope) => {
            IngestMetrics::bump(&metrics.query_param_rejected);
            return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
        }
    };

    match application_state
        .event_repository
        .live_events(limit, params.source.as_deref(), min_score)
        .await
    {
        Ok(events) => (StatusCode::OK, Json(events)).into_response(),
        Err(read_fault) => {
            warn!("📉 [QUERY]: Live feed degraded to empty: {}", read_fault);
            (StatusCode::OK, Json(Vec::<senuelo_domain_models::StoredEvent>::new()))
                .into_response()
        }
    }
}

/**
 * Endpoint: GET /stats
 */
#[instrument(skip(application_state))]
pub async fn handle_dashboard_stats(State(application_state): State<AppState>) -> Response {
    match application_state.event_repository.stats(Utc::now()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(read_fault) => {
            warn!("📉 [QUERY]: Stats degraded to zeroes: {}", read_fault);
            (StatusCode::OK, Json(empty_dashboard_stats())).into_response()
        }
    }
}

/**
 * Endpoint: GET /analytics
 */
#[instrument(skip(application_state))]
pub async fn handle_analytics(State(application_state): State<AppState>) -> Response {
    match application_state.event_repository.analytics(Utc::now()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(read_fault) => {
            warn!("📉 [QUERY]: Analytics degraded to zeroes: {}", read_fault);
            (StatusCode::OK, Json(empty_analytics_report())).into_response()
        }
    }
}

/**
 * Endpoint: GET /map
 */
#[instrument(skip(application_state))]
pub async fn handle_map_points(State(application_state): State<AppState>) -> Response {
    match application_state.event_repository.map_points().await {
        Ok(points) => (StatusCode::OK, Json(points)).into_response(),
        Err(read_fault) => {
            warn!("📉 [QUERY]: Map degraded to empty: {}", read_fault);
            (StatusCode::OK, Json(Vec::<senuelo_domain_models::MapPoint>::new())).into_response()
        }
    }
}

/**
 * Endpoint: GET /ml-insights
 */
#[instrument(skip(application_state))]
pub async fn handle_ml_insights(State(application_state): State<AppState>) -> Response {
    match application_state.event_repository.ml_insights(Utc::now()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(read_fault) => {
            warn!("📉 [QUERY]: ML insights degraded to zeroes: {}", read_fault);
            (StatusCode::OK, Json(empty_ml_insights())).into_response()
        }
    }
}

/**
 * Endpoint: GET /alerts
 */
#[instrument(skip(application_state))]
pub async fn handle_alerts(
    State(application_state): State<AppState>,
    Query(params): Query<AlertsParams>,
) -> Response {
    let metrics = &application_state.ingest_metrics;

    let threshold = match parse_bounded_score(params.threshold.as_deref(), "threshold") {
        Ok(value) => value.unwrap_or(DEFAULT_ALERT_THRESHOLD),
        Err(envelope) => {
            IngestMetrics::bump(&metrics.query_param_rejected);
            return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
        }
    };
    let limit = match parse_limit(params.limit.as_deref()) {
        Ok(limit) => limit,
        Err(envelope) => {
            IngestMetrics::bump(&metrics.query_param_rejected);
            return (StatusCode::BAD_REQUEST, Json(envelope)).into_response();
        }
    };

    match application_state.event_repository.alerts(threshold, limit).await {
        Ok(alerts) => (StatusCode::OK, Json(alerts)).into_response(),
        Err(read_fault) => {
            warn!("📉 [QUERY]: Alert feed degraded to empty: {}", read_fault);
            (StatusCode::OK, Json(Vec::<senuelo_domain_models::StoredEvent>::new()))
                .into_response()
        }
    }
}

/**
 * Endpoint: GET /investigate/{source}
 */
#[instrument(skip(application_state))]
pub async fn handle_investigation(
    State(application_state): State<AppState>,
    Path(source_address): Path<String>,
) -> Response {
    let metrics = &application_state.ingest_metrics;

    match application_state
        .event_repository
        .investigate(&source_address, Utc::now())
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(DbError::SourceNotFound) => {
            IngestMetrics::bump(&metrics.not_found);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorEnvelope::new(
                    "NotFound",
                    format!("no events recorded for source '{}'", source_address),
                )),
            )
                .into_response()
        }
        Err(read_fault) => {
            error!("💀 [QUERY]: Investigation collapsed: {}", read_fault);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope::new(read_fault.kind(), read_fault.to_string())),
            )
                .into_response()
        }
    }
}

// --- VALIDACIÓN DE PARÁMETROS ---

fn parse_limit(raw: Option<&str>) -> Result<u64, ErrorEnvelope> {
    match raw {
        None => Ok(DEFAULT_LIST_LIMIT),
        Some(text) => text.trim().parse::<u64>().map_err(|_| {
            ErrorEnvelope::new("QueryParamError", format!("limit '{}' is not a positive integer", text))
        }),
    }
}

fn parse_bounded_score(
    raw: Option<&str>,
    parameter_name: &str,
) -> Result<Option<f64>, ErrorEnvelope> {
    match raw {
        None => Ok(None),
        Some(text) => {
            let value = text.trim().parse::<f64>().map_err(|_| {
                ErrorEnvelope::new(
                    "QueryParamError",
                    format!("{} '{}' is not a number", parameter_name, text),
                )
            })?;
            if !(0.0..=1.0).contains(&value) {
                return Err(ErrorEnvelope::new(
                    "QueryParamError",
                    format!("{} {} outside [0,1]", parameter_name, value),
                ));
            }
            Ok(Some(value))
        }
    }
}

// --- REPORTES DEGRADADOS (VENTANA A CERO) ---

fn zeroed_score_series() -> Vec<ScoreSeriesPoint> {
    window_bucket_keys(hour_anchor(Utc::now()))
        .into_iter()
        .map(|bucket| ScoreSeriesPoint { bucket, avg_score: 0.0, count: 0 })
        .collect()
}

fn empty_dashboard_stats() -> DashboardStats {
    DashboardStats {
        total_events: 0,
        distinct_sources: 0,
        events_last_24h: 0,
        average_score: 0.0,
        high_risk_count: 0,
        anomaly_count: 0,
        top_services: Vec::new(),
        top_actions: Vec::new(),
        top_countries: Vec::new(),
        band_histogram: BandHistogram::default(),
        hourly_series: zeroed_score_series(),
    }
}

fn empty_analytics_report() -> AnalyticsReport {
    AnalyticsReport {
        total_24h: 0,
        high_risk_24h: 0,
        distinct_sources_24h: 0,
        average_score_24h: 0.0,
        top_countries: Vec::new(),
        top_sources: Vec::new(),
        top_protocols: Vec::new(),
        time_series: zeroed_score_series()
            .into_iter()
            .map(|point| CountSeriesPoint { bucket: point.bucket, count: 0 })
            .collect(),
    }
}

fn empty_ml_insights() -> MlInsightsReport {
    MlInsightsReport {
        average_anomaly_component: 0.0,
        anomaly_count: 0,
        hourly_series: zeroed_score_series(),
        top_risk_sources: Vec::new(),
        band_histogram: BandHistogram::default(),
        traffic_class_histogram: Vec::new(),
        suspicious_traffic_count: 0,
    }
}
