// [apps/collector/src/services/cache_warden.rs]
/*!
 * =================================================================
 * APARATO: GEO CACHE WARDEN (V3.0 - SWEEP DISCIPLINE)
 * CLASIFICACIÓN: BACKGROUND INFRASTRUCTURE SERVICE (ESTRATO L4)
 * RESPONSABILIDAD: BARRIDO PERIÓDICO DE LA CACHÉ DE ENRIQUECIMIENTO
 * =================================================================
 */

use senuelo_infra_geo::GeoEnricher;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

/// Cadencia nominal del barrido (60 segundos).
const SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Lanza el daemon de vigilancia: expulsa entradas expiradas y
/// excedentes de cupo sin tocar la ruta caliente de ingesta.
pub fn spawn_cache_warden(geo_enricher: Arc<GeoEnricher>) {
    tokio::spawn(async move {
        let mut sweep_timer = interval(Duration::from_secs(SWEEP_INTERVAL_SECONDS));
        sweep_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("🧹 [CACHE_WARDEN]: Sweep daemon operational.");
        loop {
            sweep_timer.tick().await;
            geo_enricher.sweep_cache();
        }
    });
}
