// INICIO DEL ARCHIVO [apps/collector/src/routes.rs]
/*!
 * =================================================================
 * APARATO: COLLECTOR ROUTING MATRIX (V9.0 - PANOPTICON GATEWAY)
 * CLASIFICACIÓN: API ADAPTER LAYER (ESTRATO L3)
 * RESPONSABILIDAD: TOPOLOGÍA DE RED DE INGESTA Y CONSULTA
 *
 * VISION HIPER-HOLÍSTICA:
 * La topología soporta:
 * 1. Ingesta Táctica (POST /ingest + alias histórico /log).
 * 2. Superficie de Lectura del Panóptico (7 endpoints GET).
 * 3. Sonda de Salud con verdad por componente.
 * Capas perimetrales: CORS, trazado, compresión, cota de cuerpo y
 * deadline de petición.
 * =================================================================
 */

use crate::handlers::{health, ingest, query};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Cota del cuerpo HTTP completo: payload opaco (64 KiB) más el resto
/// del registro con holgura.
const MAX_REQUEST_BODY_BYTES: usize = 256 * 1024;

pub fn create_collector_router(application_shared_state: AppState) -> Router {
    // Escudo de Red: Permite CORS para el Dashboard y herramientas de Ops
    let network_security_shield = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let request_deadline = application_shared_state.config.request_deadline;

    // ESTRATO TÁCTICO: Ingesta de los frontales de decepción
    let ingestion_stratum = Router::new()
        .route("/ingest", post(ingest::handle_event_ingestion))
        // Alias histórico conservado para productores antiguos
        .route("/log", post(ingest::handle_event_ingestion));

    // ESTRATO DE LECTURA: Superficie del Panóptico
    let query_stratum = Router::new()
        .route("/events", get(query::handle_live_events))
        .route("/stats", get(query::handle_dashboard_stats))
        .route("/analytics", get(query::handle_analytics))
        .route("/map", get(query::handle_map_points))
        .route("/ml-insights", get(query::handle_ml_insights))
        .route("/alerts", get(query::handle_alerts))
        .route("/investigate/:source", get(query::handle_investigation));

    // COMPOSICIÓN GLOBAL (Root Topology)
    Router::new()
        .merge(ingestion_stratum)
        .merge(query_stratum)
        .route("/health", get(health::handle_health_probe))
        .layer(TimeoutLayer::new(request_deadline))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(network_security_shield)
        .with_state(application_shared_state)
}
// FIN DEL ARCHIVO [apps/collector/src/routes.rs]
