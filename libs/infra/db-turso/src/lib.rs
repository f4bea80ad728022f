// [libs/infra/db-turso/src/lib.rs]
/*!
 * =================================================================
 * APARATO: DATABASE LIBRARY ROOT (V9.0 - LEDGER AUTHORITY)
 * CLASIFICACIÓN: CRATE ROOT (ESTRATO L3)
 * RESPONSABILIDAD: EXPOSICIÓN NOMINAL DEL ADAPTADOR DE PERSISTENCIA
 * =================================================================
 */

pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;

pub use client::TursoClient;
pub use errors::DbError;
pub use repositories::EventRepository;
