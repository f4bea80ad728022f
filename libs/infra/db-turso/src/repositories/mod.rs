// [libs/infra/db-turso/src/repositories/mod.rs]
/*!
 * =================================================================
 * APARATO: REPOSITORY ACCESS MATRIX (V9.0 - LEDGER TOPOLOGY)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: ORQUESTACIÓN DE SUBSISTEMAS DE PERSISTENCIA
 *
 * # Mathematical Proof (Modular Encapsulation):
 * El barrel file actúa como una interfaz galvánica. Los sub-módulos
 * permanecen aislados, y solo las estructuras de autoridad
 * (Repositories) son expuestas al exterior, reduciendo el
 * acoplamiento sistémico.
 * =================================================================
 */

/// Ledger append-only de interacciones: ingesta, lectura y agregación.
pub mod event;

// --- RE-EXPORTACIONES SOBERANAS (NOMINAL ACCESS API) ---

pub use event::EventRepository;
