// INICIO DEL ARCHIVO [libs/infra/db-turso/src/client.rs]
/*!
 * =================================================================
 * APARATO: EVENT LEDGER LINK (V12.0 - RESIDENT PIN)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: APERTURA DEL MOTOR LIBSQL Y BOOTSTRAP DEL ESQUEMA
 *
 * # Física del Enlace:
 * El esquema se sincroniza sobre el PRIMER enlace abierto, antes de
 * entregar el cliente a nadie. Cuando el ledger vive en RAM, ese
 * mismo enlace queda residente durante toda la vida del proceso:
 * SQLite descarta una base en memoria al cerrarse su última conexión,
 * y el pin residente garantiza que las tablas sigan visibles para
 * todos los hilos.
 * =================================================================
 */

use crate::errors::DbError;
use crate::schema::apply_event_ledger_schema;
use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Ubicación física del ledger, derivada de la URL configurada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LedgerLocation {
    /// Cluster remoto libSQL/Turso (requiere token de acceso).
    Remote,
    /// Base efímera en RAM (modo de los bancos de prueba).
    Memory,
    /// Fichero local en disco (despliegue por defecto).
    LocalFile,
}

fn classify_ledger_url(ledger_url: &str) -> LedgerLocation {
    if ledger_url.starts_with("libsql://") || ledger_url.starts_with("https://") {
        LedgerLocation::Remote
    } else if ledger_url.contains(":memory:") || ledger_url.contains("mode=memory") {
        LedgerLocation::Memory
    } else {
        LedgerLocation::LocalFile
    }
}

#[derive(Clone)]
pub struct TursoClient {
    ledger_engine: Arc<Database>,
    /// Pin residente que impide que SQLite descarte un ledger en RAM.
    _resident_memory_pin: Option<Arc<Connection>>,
}

impl TursoClient {
    /// Abre el motor, sincroniza el esquema y deja el ledger listo
    /// para la ingesta. En modo RAM el enlace de bootstrap queda
    /// residente; en disco o remoto se descarta tras el bootstrap.
    #[instrument(skip(remote_access_token))]
    pub async fn connect(
        ledger_url: &str,
        remote_access_token: Option<String>,
    ) -> Result<Self, DbError> {
        if ledger_url.trim().is_empty() {
            return Err(DbError::ConnectionError(
                "LEDGER_URL_VOID: no database location configured".into(),
            ));
        }

        let location = classify_ledger_url(ledger_url);
        info!("🗄️ [EVENT_LEDGER]: Opening {:?} ledger at [{}]", location, ledger_url);

        let engine = match location {
            LedgerLocation::Remote => {
                let access_token = remote_access_token.ok_or_else(|| {
                    DbError::ConnectionError(
                        "REMOTE_TOKEN_MISSING: remote ledger requires an access token".into(),
                    )
                })?;
                Builder::new_remote(ledger_url.to_string(), access_token).build().await
            }
            LedgerLocation::Memory | LedgerLocation::LocalFile => {
                Builder::new_local(ledger_url).build().await
            }
        }
        .map_err(|open_fault| {
            DbError::ConnectionError(format!("ENGINE_OPEN_FAULT: {}", open_fault))
        })?;

        let ledger_engine = Arc::new(engine);

        // Bootstrap estructural sobre el primer enlace.
        let bootstrap_link = ledger_engine.connect().map_err(|link_fault| {
            DbError::ConnectionError(format!("BOOTSTRAP_LINK_FAULT: {}", link_fault))
        })?;

        apply_event_ledger_schema(&bootstrap_link).await.map_err(|schema_fault| {
            DbError::ConnectionError(format!("SCHEMA_SYNC_INCOMPLETE: {}", schema_fault))
        })?;

        let resident_pin = if location == LedgerLocation::Memory {
            info!("📌 [EVENT_LEDGER]: In-memory ledger pinned by resident link.");
            Some(Arc::new(bootstrap_link))
        } else {
            None
        };

        Ok(Self {
            ledger_engine,
            _resident_memory_pin: resident_pin,
        })
    }

    pub fn get_connection(&self) -> Result<Connection, DbError> {
        self.ledger_engine.connect().map_err(|link_fault| {
            error!("⚠️ [EVENT_LEDGER]: Link allocation failed: {}", link_fault);
            DbError::ConnectionError(link_fault.to_string())
        })
    }

    /// Sonda de vida para el endpoint de salud: una consulta trivial
    /// confirma que el motor responde.
    pub async fn probe(&self) -> Result<(), DbError> {
        let connection = self.get_connection()?;
        connection.query("SELECT 1", ()).await?;
        Ok(())
    }
}

// FIN DEL ARCHIVO [libs/infra/db-turso/src/client.rs]
