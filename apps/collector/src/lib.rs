// [apps/collector/src/lib.rs]
/*!
 * =================================================================
 * APARATO: COLLECTOR LIBRARY ROOT (V9.0 - SOVEREIGN AUTHORITY)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN SUPREMA DEL ÁRBOL DE MÓDULOS
 * =================================================================
 */

// --- ESTRATO DE ARRANQUE Y CONFIGURACIÓN ---
/// Captura tipada y validada del entorno del proceso.
pub mod config;
/// Núcleo de mando para la ignición de servicios.
pub mod kernel;

// --- ESTRATO DE DATOS Y ESTADO (L1-APP) ---
/// Gestor del estado compartido y contadores del colector.
pub mod state;

// --- ESTRATO DE TRANSPORTE Y ACCIÓN ---
/// Adaptadores de entrada para ráfagas HTTP.
pub mod handlers;
/// Definición de rutas y topología de red.
pub mod routes;

// --- ESTRATO DE SOPORTE ---
/// Daemons de fondo: escritor único y vigilante de caché.
pub mod services;

/**
 * PRELUDIO DEL COLECTOR
 *
 * Re-exportación estratégica de los componentes necesarios para
 * la ignición mínima del sistema. Reduce el acoplamiento en 'main.rs'.
 */
pub mod prelude {
    pub use crate::config::{CollectorConfig, ConfigError};
    pub use crate::kernel::{CollectorKernel, IgnitionFault};
    pub use crate::routes::create_collector_router;
    pub use crate::state::AppState;
}
