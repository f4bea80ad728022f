// INICIO DEL ARCHIVO [libs/infra/db-turso/src/repositories/event/mod.rs]
/*!
 * =================================================================
 * APARATO: EVENT REPOSITORY (V14.0 - FIRST-WRITER-WINS)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: PERSISTENCIA Y LECTURA DEL LEDGER DE INTERACCIONES
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. DEDUP BY CONTENT: La huella SHA-256 es la clave primaria; el
 *    reintento de un productor colapsa en la fila original.
 * 2. TRANSIENT RETRY: Un fallo transitorio del motor (busy/locked)
 *    se reintenta exactamente una vez antes de aflorar al productor.
 * 3. DURABILITY FIRST: La inserción se confirma antes de que la
 *    superficie de ingesta responda éxito.
 * =================================================================
 */

pub mod analytics;
pub mod queries;

use crate::errors::DbError;
use crate::TursoClient;
use libsql::{params, Row};
use senuelo_domain_models::{
    Event, GeoFields, GeoStatus, InvestigationReport, MapPoint, PredictedClass, RiskBand,
    ScoreVerdict, StoredEvent,
};
use tracing::{debug, instrument, warn};

/// Cota dura de cualquier listado de lectura.
pub const MAX_QUERY_LIMIT: u64 = 10_000;

pub struct EventRepository {
    database_client: TursoClient,
}

impl EventRepository {
    pub fn new(client: TursoClient) -> Self {
        Self { database_client: client }
    }

    pub fn client(&self) -> &TursoClient {
        &self.database_client
    }

    /// Inserta la fila canónica. Devuelve `true` en inserción fresca y
    /// `false` cuando la huella ya residía en el Ledger (deduplicación).
    #[instrument(skip(self, event, geo, score))]
    pub async fn persist_event(
        &self,
        content_hash: &str,
        event: &Event,
        geo: &GeoFields,
        score: &ScoreVerdict,
    ) -> Result<bool, DbError> {
        match self.execute_insert(content_hash, event, geo, score).await {
            Ok(inserted) => Ok(inserted),
            Err(fault) if fault.is_transient() => {
                warn!("⚠️ [EVENT_REPO]: Transient engine fault, single retry: {}", fault);
                self.execute_insert(content_hash, event, geo, score).await
            }
            Err(fault) => Err(fault),
        }
    }

    async fn execute_insert(
        &self,
        content_hash: &str,
        event: &Event,
        geo: &GeoFields,
        score: &ScoreVerdict,
    ) -> Result<bool, DbError> {
        let connection = self.database_client.get_connection()?;

        let headers_json = event
            .headers
            .as_ref()
            .map(|map| serde_json::to_string(map))
            .transpose()
            .map_err(|fault| DbError::MappingError(fault.to_string()))?;

        let affected_rows = connection
            .execute(
                queries::INSERT_EVENT,
                params![
                    content_hash,
                    Event::storage_timestamp(&event.observed_at),
                    Event::storage_timestamp(&event.ingested_at),
                    event.source_address.clone(),
                    event.protocol.clone(),
                    event.target_service.clone(),
                    event.action.clone(),
                    event.target_path.clone(),
                    event.session_id.clone(),
                    event.user_agent.clone(),
                    headers_json,
                    event.payload_json.clone(),
                    geo.country.clone(),
                    geo.region.clone(),
                    geo.city.clone(),
                    geo.latitude,
                    geo.longitude,
                    geo.isp.clone(),
                    geo.organization.clone(),
                    geo.timezone.clone(),
                    i64::from(geo.is_private),
                    geo.status.as_str(),
                    score.value,
                    score.band.as_str(),
                    i64::from(score.is_anomaly),
                    score.predicted_class.as_str(),
                    score.traffic_class.clone(),
                    score.anomaly_component,
                    i64::from(score.scoring_degraded)
                ],
            )
            .await?;

        if affected_rows == 0 {
            debug!("♻️ [EVENT_REPO]: Fingerprint already anchored, dedup hit.");
        }
        Ok(affected_rows > 0)
    }

    /// Eventos más recientes con filtros opcionales de origen y umbral.
    pub async fn live_events(
        &self,
        limit: u64,
        source_filter: Option<&str>,
        min_score: Option<f64>,
    ) -> Result<Vec<StoredEvent>, DbError> {
        let connection = self.database_client.get_connection()?;
        let bounded_limit = limit.min(MAX_QUERY_LIMIT) as i64;

        let mut rows = connection
            .query(
                queries::FETCH_LIVE_EVENTS,
                params![
                    source_filter.unwrap_or("").to_string(),
                    min_score.unwrap_or(0.0),
                    bounded_limit
                ],
            )
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(hydrate_stored_event(&row)?);
        }
        Ok(events)
    }

    /// Eventos por encima del umbral, ordenados por severidad descendente.
    pub async fn alerts(&self, threshold: f64, limit: u64) -> Result<Vec<StoredEvent>, DbError> {
        let connection = self.database_client.get_connection()?;
        let bounded_limit = limit.min(MAX_QUERY_LIMIT) as i64;

        let mut rows = connection
            .query(queries::FETCH_ALERTS, params![threshold, bounded_limit])
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(hydrate_stored_event(&row)?);
        }
        Ok(events)
    }

    /// Agregación por origen geolocalizado para el mapa de amenazas.
    pub async fn map_points(&self) -> Result<Vec<MapPoint>, DbError> {
        let connection = self.database_client.get_connection()?;
        let mut rows = connection.query(queries::MAP_POINTS, ()).await?;

        let mut points = Vec::new();
        while let Some(row) = rows.next().await? {
            points.push(MapPoint {
                source_address: row.get::<String>(0)?,
                count: row.get::<i64>(1)? as u64,
                avg_score: row.get::<f64>(2)?,
                country: row.get::<Option<String>>(3)?,
                city: row.get::<Option<String>>(4)?,
                latitude: row.get::<f64>(5)?,
                longitude: row.get::<f64>(6)?,
            });
        }
        Ok(points)
    }

    /// Expediente completo de una dirección. `SourceNotFound` cuando el
    /// Ledger no tiene filas para ella.
    #[instrument(skip(self))]
    pub async fn investigate(
        &self,
        source_address: &str,
        anchor_now: chrono::DateTime<chrono::Utc>,
    ) -> Result<InvestigationReport, DbError> {
        let connection = self.database_client.get_connection()?;

        let mut rows = connection
            .query(
                queries::FETCH_SOURCE_DOSSIER,
                params![source_address.to_string(), MAX_QUERY_LIMIT as i64],
            )
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(hydrate_stored_event(&row)?);
        }

        if events.is_empty() {
            return Err(DbError::SourceNotFound);
        }

        Ok(analytics::assemble_investigation(source_address, events, anchor_now))
    }
}

/// Hidrata una fila del Ledger en la proyección completa de 29 columnas.
pub(crate) fn hydrate_stored_event(row: &Row) -> Result<StoredEvent, DbError> {
    let headers = row
        .get::<Option<String>>(10)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|fault| DbError::MappingError(format!("headers_json: {}", fault)))?;

    let payload = row
        .get::<Option<String>>(11)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(|fault| DbError::MappingError(format!("payload_json: {}", fault)))?;

    let geo_status = match row.get::<String>(21)?.as_str() {
        "resolved" => GeoStatus::Resolved,
        "private" => GeoStatus::Private,
        _ => GeoStatus::Unresolved,
    };

    Ok(StoredEvent {
        content_hash: row.get::<String>(0)?,
        observed_at: row.get::<String>(1)?,
        ingested_at: row.get::<String>(2)?,
        source_address: row.get::<String>(3)?,
        protocol: row.get::<Option<String>>(4)?,
        target_service: row.get::<String>(5)?,
        action: row.get::<String>(6)?,
        target_path: row.get::<Option<String>>(7)?,
        session_id: row.get::<String>(8)?,
        user_agent: row.get::<Option<String>>(9)?,
        headers,
        payload,
        geo: GeoFields {
            country: row.get::<Option<String>>(12)?,
            region: row.get::<Option<String>>(13)?,
            city: row.get::<Option<String>>(14)?,
            latitude: row.get::<Option<f64>>(15)?,
            longitude: row.get::<Option<f64>>(16)?,
            isp: row.get::<Option<String>>(17)?,
            organization: row.get::<Option<String>>(18)?,
            timezone: row.get::<Option<String>>(19)?,
            is_private: row.get::<i64>(20)? != 0,
            status: geo_status,
        },
        score: ScoreVerdict {
            value: row.get::<f64>(22)?,
            band: RiskBand::from_stored(&row.get::<String>(23)?),
            is_anomaly: row.get::<i64>(24)? != 0,
            predicted_class: PredictedClass::from_stored(&row.get::<String>(25)?),
            traffic_class: row.get::<String>(26)?,
            anomaly_component: row.get::<f64>(27)?,
            scoring_degraded: row.get::<i64>(28)? != 0,
        },
    })
}
// FIN DEL ARCHIVO [libs/infra/db-turso/src/repositories/event/mod.rs]
