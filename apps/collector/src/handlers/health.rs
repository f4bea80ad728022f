// [apps/collector/src/handlers/health.rs]
/*!
 * =================================================================
 * APARATO: HEALTH PROBE GATEWAY (V6.0 - COMPONENT TRUTH)
 * CLASIFICACIÓN: API ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: ESTADO POR COMPONENTE Y CONTADORES DE FALLO
 *
 * # Niveles:
 * - operational: motor alcanzable, cola con holgura.
 * - degraded:    cola de escritura a media capacidad o peor.
 * - critical:    motor de persistencia inalcanzable (sonda fallida);
 *                se emite 503 para los orquestadores de despliegue.
 * =================================================================
 */

use crate::state::{AppState, MetricsSnapshot};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub reachable: bool,
}

#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub loaded: bool,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsHealth {
    pub supervised: ModelStatus,
    pub unsupervised: ModelStatus,
    pub secondary: ModelStatus,
}

#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub entries: usize,
    pub capacity: usize,
}

#[derive(Debug, Serialize)]
pub struct QueueHealth {
    pub depth: usize,
    pub capacity: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub store: StoreHealth,
    pub models: ModelsHealth,
    pub enrichment_cache: CacheHealth,
    pub write_queue: QueueHealth,
    pub error_counters: MetricsSnapshot,
}

/**
 * Endpoint: GET /health
 */
#[instrument(skip(application_state))]
pub async fn handle_health_probe(State(application_state): State<AppState>) -> Response {
    let store_reachable = application_state.database_client.probe().await.is_ok();

    let artifacts = application_state.ensemble_engine.artifacts();
    let (cache_entries, cache_capacity) = application_state.geo_enricher.cache_metrics();
    let queue_depth = application_state.write_queue_depth();
    let queue_capacity = application_state.write_queue_capacity;

    let status = if !store_reachable {
        "critical"
    } else if queue_depth * 2 >= queue_capacity {
        "degraded"
    } else {
        "operational"
    };

    let report = HealthReport {
        status,
        store: StoreHealth { reachable: store_reachable },
        models: ModelsHealth {
            supervised: ModelStatus {
                loaded: true,
                name: artifacts.supervised.name.clone(),
                version: artifacts.supervised.version.clone(),
            },
            unsupervised: ModelStatus {
                loaded: true,
                name: artifacts.unsupervised.name.clone(),
                version: artifacts.unsupervised.version.clone(),
            },
            secondary: ModelStatus {
                loaded: true,
                name: artifacts.secondary.name.clone(),
                version: artifacts.secondary.version.clone(),
            },
        },
        enrichment_cache: CacheHealth { entries: cache_entries, capacity: cache_capacity },
        write_queue: QueueHealth { depth: queue_depth, capacity: queue_capacity },
        error_counters: application_state.ingest_metrics.snapshot(),
    };

    let http_status = if store_reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(report)).into_response()
}
