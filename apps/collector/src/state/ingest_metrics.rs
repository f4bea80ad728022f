// [apps/collector/src/state/ingest_metrics.rs]
/*!
 * =================================================================
 * APARATO: INGEST METRICS LEDGER (V4.0 - FULL DROP ACCOUNTING)
 * CLASIFICACIÓN: APPLICATION STATE (ESTRATO L1-APP)
 * RESPONSABILIDAD: CONTADORES ATÓMICOS POR TIPO DE FALLO
 *
 * # Contrato:
 * Cada ruta de aceptación y de descarte incrementa exactamente un
 * contador. El endpoint de salud expone la instantánea completa.
 * =================================================================
 */

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct IngestMetrics {
    pub ingested_ok: AtomicU64,
    pub deduplicated: AtomicU64,
    pub schema_rejected: AtomicU64,
    pub payload_rejected: AtomicU64,
    pub enrichment_unavailable: AtomicU64,
    pub scoring_degraded: AtomicU64,
    pub store_transient: AtomicU64,
    pub store_fatal: AtomicU64,
    pub backpressure_rejected: AtomicU64,
    pub query_param_rejected: AtomicU64,
    pub not_found: AtomicU64,
}

/// Instantánea serializable de los contadores.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub ingested_ok: u64,
    pub deduplicated: u64,
    pub schema_rejected: u64,
    pub payload_rejected: u64,
    pub enrichment_unavailable: u64,
    pub scoring_degraded: u64,
    pub store_transient: u64,
    pub store_fatal: u64,
    pub backpressure_rejected: u64,
    pub query_param_rejected: u64,
    pub not_found: u64,
}

impl IngestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ingested_ok: self.ingested_ok.load(Ordering::Relaxed),
            deduplicated: self.deduplicated.load(Ordering::Relaxed),
            schema_rejected: self.schema_rejected.load(Ordering::Relaxed),
            payload_rejected: self.payload_rejected.load(Ordering::Relaxed),
            enrichment_unavailable: self.enrichment_unavailable.load(Ordering::Relaxed),
            scoring_degraded: self.scoring_degraded.load(Ordering::Relaxed),
            store_transient: self.store_transient.load(Ordering::Relaxed),
            store_fatal: self.store_fatal.load(Ordering::Relaxed),
            backpressure_rejected: self.backpressure_rejected.load(Ordering::Relaxed),
            query_param_rejected: self.query_param_rejected.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}
