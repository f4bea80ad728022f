/**
 * =================================================================
 * APARATO: EVENT LEDGER SCHEMA (V12.0 - APPEND-ONLY STRATA)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GOBERNANZA ESTRUCTURAL E IDEMPOTENCIA TOTAL
 *
 * VISION HIPER-HOLÍSTICA:
 * 1. APPEND-ONLY LEDGER: Una única relación 'events' sin rutas de
 *    actualización ni borrado; la huella de contenido es la clave.
 * 2. ADDITIVE EVOLUTION: Las migraciones solo añaden columnas con
 *    DEFAULT; una columna ya presente no es un fallo.
 * 3. PERFORMANCE: Índices de aceleración para ventanas temporales,
 *    filtrado por origen y escalera de bandas.
 * =================================================================
 */

use anyhow::{Context, Result};
use libsql::Connection;
use tracing::{debug, info, instrument, warn};

/**
 * ESTRATO 1: TABLAS BASE
 * Define la relación única del Ledger de interacciones.
 */
const LEDGER_TABLES: &[(&str, &str)] = &[
    ("TABLE_EVENTS", r#"
        CREATE TABLE IF NOT EXISTS events (
            content_hash TEXT PRIMARY KEY,
            observed_at TEXT NOT NULL,
            ingested_at TEXT NOT NULL,
            source_address TEXT NOT NULL,
            protocol TEXT,
            target_service TEXT NOT NULL,
            action TEXT NOT NULL,
            target_path TEXT,
            session_id TEXT NOT NULL,
            user_agent TEXT,
            headers_json TEXT,
            payload_json TEXT,
            geo_country TEXT,
            geo_region TEXT,
            geo_city TEXT,
            geo_latitude REAL,
            geo_longitude REAL,
            geo_isp TEXT,
            geo_organization TEXT,
            geo_is_private INTEGER NOT NULL DEFAULT 0,
            geo_status TEXT NOT NULL DEFAULT 'unresolved',
            score_value REAL NOT NULL DEFAULT 0.0,
            score_band TEXT NOT NULL DEFAULT 'MINIMAL',
            score_is_anomaly INTEGER NOT NULL DEFAULT 0,
            score_predicted_class TEXT NOT NULL DEFAULT 'BENIGN',
            score_traffic_class TEXT NOT NULL DEFAULT 'UNKNOWN'
        );
    "#),
];

/**
 * ESTRATO 2: COLUMNAS ADITIVAS
 * Solo adiciones con DEFAULT; jamás mutaciones destructivas.
 */
const ADDITIVE_COLUMNS: &[(&str, &str)] = &[
    // --- TELEMETRÍA DEL ENSAMBLE ---
    ("EVENT_ANOMALY_COMPONENT", "ALTER TABLE events ADD COLUMN score_anomaly_component REAL NOT NULL DEFAULT 0.0"),
    ("EVENT_SCORING_DEGRADED", "ALTER TABLE events ADD COLUMN scoring_degraded INTEGER NOT NULL DEFAULT 0"),

    // --- ENRIQUECIMIENTO EXTENDIDO ---
    ("EVENT_GEO_TIMEZONE", "ALTER TABLE events ADD COLUMN geo_timezone TEXT"),
];

/**
 * ESTRATO 3: ÍNDICES DE ACELERACIÓN
 * Optimiza ventanas temporales, filtrado por origen y agregaciones.
 */
const LEDGER_INDEXES: &[(&str, &str)] = &[
    ("IDX_EVENTS_INGESTED_AT", "CREATE INDEX IF NOT EXISTS idx_ingested_at ON events(ingested_at);"),
    ("IDX_EVENTS_SOURCE", "CREATE INDEX IF NOT EXISTS idx_source_address ON events(source_address);"),
    ("IDX_EVENTS_ACTION", "CREATE INDEX IF NOT EXISTS idx_action ON events(action);"),
    ("IDX_EVENTS_SERVICE", "CREATE INDEX IF NOT EXISTS idx_target_service ON events(target_service);"),
    ("IDX_EVENTS_BAND", "CREATE INDEX IF NOT EXISTS idx_band ON events(score_band);"),
    ("IDX_EVENTS_CONTENT_HASH", "CREATE UNIQUE INDEX IF NOT EXISTS idx_content_hash ON events(content_hash);"),
];

/**
 * Sincroniza la estructura completa del Ledger: tabla base, columnas
 * aditivas e índices. Reentrante: puede ejecutarse en caliente sobre
 * una base ya poblada sin efectos destructivos.
 *
 * # Errors:
 * Retorna error si la tabla base o un índice no pueden levantarse;
 * las columnas aditivas toleran la preexistencia.
 */
#[instrument(skip(database_connection))]
pub async fn apply_event_ledger_schema(database_connection: &Connection) -> Result<()> {
    info!("🏗️ [SCHEMA_ENGINE]: Synchronizing event ledger structure V12.0...");

    raise_event_table(database_connection).await?;
    apply_additive_columns(database_connection).await?;
    raise_acceleration_indexes(database_connection).await?;

    info!("✅ [SCHEMA_ENGINE]: Event ledger structure level.");
    Ok(())
}

async fn raise_event_table(db: &Connection) -> Result<()> {
    for (identifier, create_sql) in LEDGER_TABLES {
        debug!("  ↳ Raising table stratum {}", identifier);
        db.execute(*create_sql, ())
            .await
            .with_context(|| format!("TABLE_RAISE_FAULT: {}", identifier))?;
    }
    Ok(())
}

async fn apply_additive_columns(db: &Connection) -> Result<()> {
    for (identifier, alter_sql) in ADDITIVE_COLUMNS {
        match db.execute(*alter_sql, ()).await {
            Ok(_) => info!("  ➕ [EVOLUTION]: Column stratum {} applied.", identifier),
            Err(alter_fault) => {
                let fault_text = alter_fault.to_string();
                // El motor señala así una columna ya migrada; no es un fallo.
                if fault_text.contains("duplicate column name") {
                    debug!("  ⏭️ [EVOLUTION]: Column stratum {} already present.", identifier);
                } else {
                    warn!(
                        "  🚧 [EVOLUTION]: Column stratum {} left unapplied: {}",
                        identifier, fault_text
                    );
                }
            }
        }
    }
    Ok(())
}

async fn raise_acceleration_indexes(db: &Connection) -> Result<()> {
    for (identifier, index_sql) in LEDGER_INDEXES {
        debug!("  ↳ Raising index {}", identifier);
        db.execute(*index_sql, ())
            .await
            .with_context(|| format!("INDEX_RAISE_FAULT: {}", identifier))?;
    }
    Ok(())
}
