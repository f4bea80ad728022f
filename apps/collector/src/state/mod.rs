// [apps/collector/src/state/mod.rs]
/*!
 * =================================================================
 * APARATO: COLLECTOR STATE ORCHESTRATOR (V9.0 - SINGLE HANDLE)
 * CLASIFICACIÓN: APPLICATION STATE (ESTRATO L1-APP)
 * RESPONSABILIDAD: ORQUESTACIÓN DE REPOSITORIOS, CORTEX Y DAEMONS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE HANDLE: Todo el estado compartido viaja en un único
 *    contenedor clonable creado en el arranque; cero globals mutables.
 * 2. IMMUTABLE CORTEX: El trío de artefactos y el motor del ensamble
 *    se comparten vía Arc sin cerrojos.
 * 3. COMPOSITION ROOT: El Kernel inyecta aquí cliente táctico,
 *    enriquecedor, cola de escritura y contadores.
 * =================================================================
 */

pub mod ingest_metrics;

pub use ingest_metrics::{IngestMetrics, MetricsSnapshot};

use crate::config::CollectorConfig;
use crate::services::{spawn_write_pipeline, WriteQueueSender};
use senuelo_domain_ai_cortex::{ArtifactSet, CortexError, EnsembleEngine};
use senuelo_infra_db::{EventRepository, TursoClient};
use senuelo_infra_geo::GeoEnricher;
use std::sync::Arc;
use tracing::debug;

/**
 * Contenedor de estado compartido (Thread-Safe) para el Colector.
 * Actúa como la placa base donde se conectan todos los estratos.
 */
#[derive(Clone)]
pub struct AppState {
    /// Cliente táctico del motor libSQL.
    pub database_client: TursoClient,
    /// Repositorio del Ledger de interacciones (lecturas).
    pub event_repository: Arc<EventRepository>,
    /// Motor de inferencia del trío cognitivo (inmutable).
    pub ensemble_engine: Arc<EnsembleEngine>,
    /// Enriquecedor geográfico con caché bifásica.
    pub geo_enricher: Arc<GeoEnricher>,
    /// Extremo emisor de la cola del escritor único.
    pub write_pipeline: WriteQueueSender,
    /// Capacidad nominal de la cola (marca de agua de backpressure).
    pub write_queue_capacity: usize,
    /// Contadores atómicos por tipo de fallo.
    pub ingest_metrics: Arc<IngestMetrics>,
    /// Configuración inmutable del proceso.
    pub config: Arc<CollectorConfig>,
}

impl AppState {
    /**
     * Forja el Estado Maestro inyectando todas las dependencias y
     * lanzando el daemon escritor sobre el reactor activo.
     */
    pub fn assemble(
        database_client: TursoClient,
        artifact_set: ArtifactSet,
        config: CollectorConfig,
    ) -> Result<Self, CortexError> {
        debug!("🧬 [APP_STATE]: Executing collector ignition sequence V9.0...");

        let ensemble_engine = Arc::new(EnsembleEngine::new(
            Arc::new(artifact_set),
            config.ensemble_weights,
            config.band_cutoffs,
            config.indicator_policy.clone(),
        )?);

        let geo_enricher = Arc::new(GeoEnricher::new(config.geo.clone()));

        let event_repository = Arc::new(EventRepository::new(database_client.clone()));
        let write_queue_capacity = config.backpressure_high_watermark.max(1);
        let write_pipeline =
            spawn_write_pipeline(event_repository.clone(), write_queue_capacity);

        Ok(Self {
            database_client,
            event_repository,
            ensemble_engine,
            geo_enricher,
            write_pipeline,
            write_queue_capacity,
            ingest_metrics: Arc::new(IngestMetrics::new()),
            config: Arc::new(config),
        })
    }

    /// Profundidad actual de la cola de escritura (observabilidad).
    pub fn write_queue_depth(&self) -> usize {
        self.write_queue_capacity
            .saturating_sub(self.write_pipeline.capacity())
    }
}
