// [apps/collector/src/services/mod.rs]
/**
 * =================================================================
 * APARATO: SERVICE ORCHESTRATION HUB (V7.0 - COLLECTOR DAEMONS)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DE DAEMONS DE FONDO
 *
 * # Topología de Módulos:
 * - write_pipeline: escritor lógico único con cola acotada y acks.
 * - cache_warden:   barrido TTL/capacidad de la caché geográfica.
 * =================================================================
 */

pub mod cache_warden;
pub mod write_pipeline;

// --- RE-EXPORTACIONES SOBERANAS (NOMINAL ACCESS) ---

pub use cache_warden::spawn_cache_warden;
pub use write_pipeline::{spawn_write_pipeline, WriteCommand, WriteQueueSender};
