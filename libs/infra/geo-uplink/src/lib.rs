// INICIO DEL ARCHIVO [libs/infra/geo-uplink/src/lib.rs]
/*!
 * =================================================================
 * APARATO: GEO ENRICHMENT ORCHESTRATOR (V7.0 - NEVER-STALL)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: ENRIQUECIMIENTO GEOGRÁFICO SIN BLOQUEAR LA INGESTA
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. NEVER-STALL CONTRACT: enrich() jamás devuelve error a la ruta de
 *    ingesta; todo fallo degrada a resultado no resuelto.
 * 2. PRIVATE SHORT-CIRCUIT: Rangos no enrutables cortocircuitan sin
 *    consulta externa ni ocupación de cupo.
 * 3. BOUNDED CONCURRENCY: Semáforo de N vuelos simultáneos con
 *    presupuesto de espera de 500 ms; el excedente degrada.
 * 4. DUAL TTL CACHE: Positivos 24 h, negativos 5 min, cupo acotado.
 * =================================================================
 */

pub mod cache;
pub mod client;
pub mod errors;

pub use cache::GeoCache;
pub use client::{is_private_address, GeoUplinkClient};
pub use errors::GeoUplinkError;

use chrono::Utc;
use senuelo_domain_models::GeoFields;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

/// Configuración completa del enriquecedor.
#[derive(Debug, Clone)]
pub struct GeoEnricherConfig {
    pub provider_base_url: String,
    pub lookup_timeout: Duration,
    pub concurrency: usize,
    pub acquire_budget: Duration,
    pub cache_capacity: usize,
    pub positive_ttl: Duration,
    pub negative_ttl: Duration,
}

impl Default for GeoEnricherConfig {
    fn default() -> Self {
        Self {
            provider_base_url: "http://ip-api.com/json".to_string(),
            lookup_timeout: Duration::from_millis(2_000),
            concurrency: 16,
            acquire_budget: Duration::from_millis(500),
            cache_capacity: 50_000,
            positive_ttl: Duration::from_secs(24 * 3_600),
            negative_ttl: Duration::from_secs(5 * 60),
        }
    }
}

pub struct GeoEnricher {
    uplink: GeoUplinkClient,
    cache: GeoCache,
    flight_limiter: Arc<Semaphore>,
    acquire_budget: Duration,
}

impl GeoEnricher {
    pub fn new(config: GeoEnricherConfig) -> Self {
        Self {
            uplink: GeoUplinkClient::new(config.provider_base_url, config.lookup_timeout),
            cache: GeoCache::new(
                config.cache_capacity,
                config.positive_ttl,
                config.negative_ttl,
            ),
            flight_limiter: Arc::new(Semaphore::new(config.concurrency.max(1))),
            acquire_budget: config.acquire_budget,
        }
    }

    /**
     * Transforma una dirección de origen en campos geográficos.
     * Contrato never-stall: este método no falla ni excede el
     * presupuesto del semáforo más el timeout del uplink.
     */
    #[instrument(skip(self))]
    pub async fn enrich(&self, source_address: &str) -> GeoFields {
        // 1. CORTOCIRCUITO DE RANGOS NO ENRUTABLES
        if is_private_address(source_address) {
            debug!("🔒 [GEO]: Private range short-circuit for [{}].", source_address);
            return GeoFields::private_range();
        }

        // 2. ESTRATO DE CACHÉ (TTL bifásico)
        let now = Utc::now();
        if let Some(cached_fields) = self.cache.lookup(source_address, now) {
            return cached_fields;
        }

        // 3. CUPO DE VUELOS SIMULTÁNEOS (presupuesto 500 ms)
        let acquisition = tokio::time::timeout(
            self.acquire_budget,
            self.flight_limiter.clone().acquire_owned(),
        )
        .await;

        let _flight_permit = match acquisition {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) | Err(_) => {
                warn!("⏳ [GEO]: Uplink saturated, degrading [{}] to unresolved.", source_address);
                return GeoFields::unresolved();
            }
        };

        // 4. RESOLUCIÓN EXTERNA (sin reintentos en caliente)
        match self.uplink.resolve(source_address).await {
            Ok(resolved_fields) => {
                self.cache.store(source_address, resolved_fields.clone(), now);
                resolved_fields
            }
            Err(uplink_fault) => {
                warn!(
                    "🌐 [GEO]: Lookup absorbed for [{}]: {}",
                    source_address, uplink_fault
                );
                let unresolved = GeoFields::unresolved();
                // TTL negativo: el fallo se recuerda 5 minutos.
                self.cache.store(source_address, unresolved.clone(), now);
                unresolved
            }
        }
    }

    /// Métricas para el endpoint de salud: (entradas vivas, capacidad).
    pub fn cache_metrics(&self) -> (usize, usize) {
        (self.cache.len(), self.cache.capacity())
    }

    /// Barrido invocado por el daemon de vigilancia de caché.
    pub fn sweep_cache(&self) {
        self.cache.sweep(Utc::now());
    }
}
// FIN DEL ARCHIVO [libs/infra/geo-uplink/src/lib.rs]
