// [libs/infra/db-turso/src/repositories/event/analytics.rs]
/*!
 * =================================================================
 * APARATO: LEDGER AGGREGATION ENGINE (V10.0 - WINDOW AUTHORITY)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: AGREGACIONES VENTANEADAS PARA EL PANÓPTICO
 *
 * # Física de Ventana:
 * El ancla es SIEMPRE la hora UTC actual, nunca la fila más reciente
 * (visibilidad de pipeline detenido). La ventana de 24 h cubre los 24
 * cubos consecutivos que terminan en el ancla inclusive; los cubos
 * sin filas se completan a cero en este estrato, por lo que una base
 * vacía sigue produciendo 24 entradas en orden ascendente.
 * =================================================================
 */

use super::queries;
use super::EventRepository;
use crate::errors::DbError;
use chrono::{DateTime, Duration, Timelike, Utc};
use libsql::{params, params::IntoParams, Connection, Row};
use senuelo_domain_models::{
    AnalyticsReport, BandHistogram, CountSeriesPoint, DashboardStats, Event, InvestigationReport,
    LabelCount, MlInsightsReport, ScoreSeriesPoint, SourceScore, StoredEvent,
};
use std::collections::{BTreeSet, HashMap};
use tracing::instrument;

/// Tamaño de los listados top-N del dashboard.
const TOP_N: i64 = 10;
/// Umbral de puntuación media para el listado de orígenes de alto riesgo.
const HIGH_RISK_SOURCE_THRESHOLD: f64 = 0.8;
/// Horas cubiertas por la ventana de análisis.
const WINDOW_HOURS: i64 = 24;

/// Trunca un instante a su hora UTC (clave de cubo).
pub fn hour_anchor(now: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = now
        .date_naive()
        .and_hms_opt(now.hour(), 0, 0)
        .expect("hour-of-day is always a valid wall time");
    DateTime::from_naive_utc_and_offset(truncated, Utc)
}

/// Clave canónica de cubo horario 'YYYY-MM-DDTHH:00:00Z'.
pub fn bucket_key(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:00:00Z").to_string()
}

/// Las 24 claves de cubo de la ventana, en orden ascendente.
pub fn window_bucket_keys(anchor: DateTime<Utc>) -> Vec<String> {
    (0..WINDOW_HOURS)
        .map(|offset| bucket_key(&(anchor - Duration::hours(WINDOW_HOURS - 1 - offset))))
        .collect()
}

/// Cota inferior de la ventana en el formato de almacenamiento.
pub fn window_floor(anchor: DateTime<Utc>) -> String {
    Event::storage_timestamp(&(anchor - Duration::hours(WINDOW_HOURS - 1)))
}

impl EventRepository {
    /// Resumen principal del dashboard: totales de vida completa,
    /// top-N y serie horaria de 24 cubos.
    #[instrument(skip(self))]
    pub async fn stats(&self, anchor_now: DateTime<Utc>) -> Result<DashboardStats, DbError> {
        let connection = self.client().get_connection()?;
        let anchor = hour_anchor(anchor_now);
        let floor = window_floor(anchor);

        let totals = single_row(&connection, queries::AGGREGATE_GLOBAL_TOTALS, ()).await?;
        let total_events = totals.get::<i64>(0)? as u64;
        let distinct_sources = totals.get::<i64>(1)? as u64;
        let average_score = totals.get::<f64>(2)?;
        let high_risk_count = totals.get::<i64>(3)? as u64;
        let anomaly_count = totals.get::<i64>(4)? as u64;

        let windowed = single_row(
            &connection,
            queries::COUNT_WINDOWED_EVENTS,
            params![floor.clone()],
        )
        .await?;
        let events_last_24h = windowed.get::<i64>(0)? as u64;

        let top_services = fetch_label_counts(&connection, queries::TOP_SERVICES, params![TOP_N]).await?;
        let top_actions = fetch_label_counts(&connection, queries::TOP_ACTIONS, params![TOP_N]).await?;
        let top_countries = fetch_label_counts(&connection, queries::TOP_COUNTRIES, params![TOP_N]).await?;

        let band_histogram = fetch_band_histogram(&connection).await?;
        let hourly_series = fetch_filled_score_series(&connection, anchor, &floor).await?;

        Ok(DashboardStats {
            total_events,
            distinct_sources,
            events_last_24h,
            average_score,
            high_risk_count,
            anomaly_count,
            top_services,
            top_actions,
            top_countries,
            band_histogram,
            hourly_series,
        })
    }

    /// Página de analítica: todos los agregados sobre la ventana de 24 h.
    #[instrument(skip(self))]
    pub async fn analytics(&self, anchor_now: DateTime<Utc>) -> Result<AnalyticsReport, DbError> {
        let connection = self.client().get_connection()?;
        let anchor = hour_anchor(anchor_now);
        let floor = window_floor(anchor);

        let totals = single_row(
            &connection,
            queries::AGGREGATE_WINDOWED_TOTALS,
            params![floor.clone()],
        )
        .await?;
        let total_24h = totals.get::<i64>(0)? as u64;
        let high_risk_24h = totals.get::<i64>(1)? as u64;
        let distinct_sources_24h = totals.get::<i64>(2)? as u64;
        let average_score_24h = totals.get::<f64>(3)?;

        let top_countries = fetch_label_counts(
            &connection,
            queries::TOP_COUNTRIES_WINDOWED,
            params![floor.clone(), TOP_N],
        )
        .await?;
        let top_sources = fetch_label_counts(
            &connection,
            queries::TOP_SOURCES_WINDOWED,
            params![floor.clone(), TOP_N],
        )
        .await?;
        let top_protocols = fetch_label_counts(
            &connection,
            queries::TOP_PROTOCOLS_WINDOWED,
            params![floor.clone(), TOP_N],
        )
        .await?;

        let time_series = fetch_filled_score_series(&connection, anchor, &floor)
            .await?
            .into_iter()
            .map(|point| CountSeriesPoint { bucket: point.bucket, count: point.count })
            .collect();

        Ok(AnalyticsReport {
            total_24h,
            high_risk_24h,
            distinct_sources_24h,
            average_score_24h,
            top_countries,
            top_sources,
            top_protocols,
            time_series,
        })
    }

    /// Página de inteligencia del ensamble.
    #[instrument(skip(self))]
    pub async fn ml_insights(&self, anchor_now: DateTime<Utc>) -> Result<MlInsightsReport, DbError> {
        let connection = self.client().get_connection()?;
        let anchor = hour_anchor(anchor_now);
        let floor = window_floor(anchor);

        let anomaly_totals = single_row(&connection, queries::ANOMALY_TOTALS, ()).await?;
        let average_anomaly_component = anomaly_totals.get::<f64>(0)?;
        let anomaly_count = anomaly_totals.get::<i64>(1)? as u64;

        let hourly_series = fetch_filled_score_series(&connection, anchor, &floor).await?;

        let mut top_risk_sources = Vec::new();
        let mut rows = connection
            .query(
                queries::TOP_RISK_SOURCES,
                params![HIGH_RISK_SOURCE_THRESHOLD, TOP_N],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            top_risk_sources.push(SourceScore {
                source_address: row.get::<String>(0)?,
                avg_score: row.get::<f64>(1)?,
                count: row.get::<i64>(2)? as u64,
            });
        }

        let band_histogram = fetch_band_histogram(&connection).await?;
        let traffic_class_histogram =
            fetch_label_counts(&connection, queries::TRAFFIC_CLASS_HISTOGRAM, ()).await?;

        let suspicious = single_row(&connection, queries::SUSPICIOUS_TRAFFIC_COUNT, ()).await?;
        let suspicious_traffic_count = suspicious.get::<i64>(0)? as u64;

        Ok(MlInsightsReport {
            average_anomaly_component,
            anomaly_count,
            hourly_series,
            top_risk_sources,
            band_histogram,
            traffic_class_histogram,
            suspicious_traffic_count,
        })
    }
}

/// Ensambla el expediente de investigación a partir del dossier completo
/// de la dirección (ordenado por ingesta descendente).
pub(crate) fn assemble_investigation(
    source_address: &str,
    events: Vec<StoredEvent>,
    anchor_now: DateTime<Utc>,
) -> InvestigationReport {
    let anchor = hour_anchor(anchor_now);
    let window_keys = window_bucket_keys(anchor);

    let total_events = events.len() as u64;
    let first_seen = events
        .iter()
        .map(|event| event.ingested_at.as_str())
        .min()
        .unwrap_or_default()
        .to_string();
    let last_seen = events
        .iter()
        .map(|event| event.ingested_at.as_str())
        .max()
        .unwrap_or_default()
        .to_string();

    let average_score = if events.is_empty() {
        0.0
    } else {
        events.iter().map(|event| event.score.value).sum::<f64>() / events.len() as f64
    };
    let max_score = events
        .iter()
        .map(|event| event.score.value)
        .fold(0.0_f64, f64::max);

    let distinct_actions: Vec<String> = events
        .iter()
        .map(|event| event.action.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let distinct_services: Vec<String> = events
        .iter()
        .map(|event| event.target_service.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // Serie horaria del origen dentro de la ventana, cubos vacíos a cero.
    let mut per_bucket: HashMap<&str, (f64, u64)> = HashMap::new();
    for event in &events {
        if event.ingested_at.len() < 13 {
            continue;
        }
        let event_bucket = format!("{}:00:00Z", &event.ingested_at[..13]);
        if let Some(key) = window_keys.iter().find(|key| **key == event_bucket) {
            let slot = per_bucket.entry(key.as_str()).or_insert((0.0, 0));
            slot.0 += event.score.value;
            slot.1 += 1;
        }
    }

    let hourly_series = window_keys
        .iter()
        .map(|key| {
            let (score_sum, count) = per_bucket.get(key.as_str()).copied().unwrap_or((0.0, 0));
            ScoreSeriesPoint {
                bucket: key.clone(),
                avg_score: if count > 0 { score_sum / count as f64 } else { 0.0 },
                count,
            }
        })
        .collect();

    InvestigationReport {
        source_address: source_address.to_string(),
        total_events,
        first_seen,
        last_seen,
        average_score,
        max_score,
        distinct_actions,
        distinct_services,
        hourly_series,
        events,
    }
}

async fn single_row(
    connection: &Connection,
    sql: &str,
    parameters: impl IntoParams,
) -> Result<Row, DbError> {
    let mut rows = connection.query(sql, parameters).await?;
    rows.next()
        .await?
        .ok_or_else(|| DbError::MappingError("aggregate query returned no row".to_string()))
}

async fn fetch_label_counts(
    connection: &Connection,
    sql: &str,
    parameters: impl IntoParams,
) -> Result<Vec<LabelCount>, DbError> {
    let mut rows = connection.query(sql, parameters).await?;
    let mut counts = Vec::new();
    while let Some(row) = rows.next().await? {
        counts.push(LabelCount {
            label: row.get::<String>(0)?,
            count: row.get::<i64>(1)? as u64,
        });
    }
    Ok(counts)
}

async fn fetch_band_histogram(connection: &Connection) -> Result<BandHistogram, DbError> {
    let mut rows = connection.query(queries::BAND_HISTOGRAM, ()).await?;
    let mut histogram = BandHistogram::default();
    while let Some(row) = rows.next().await? {
        let volume = row.get::<i64>(1)? as u64;
        match row.get::<String>(0)?.as_str() {
            "HIGH" => histogram.high = volume,
            "MEDIUM" => histogram.medium = volume,
            "LOW" => histogram.low = volume,
            _ => histogram.minimal = volume,
        }
    }
    Ok(histogram)
}

/// Serie (cubo, media, volumen) con los 24 cubos de la ventana
/// garantizados en orden ascendente.
async fn fetch_filled_score_series(
    connection: &Connection,
    anchor: DateTime<Utc>,
    floor: &str,
) -> Result<Vec<ScoreSeriesPoint>, DbError> {
    let mut rows = connection
        .query(queries::HOURLY_SCORE_SERIES, params![floor.to_string()])
        .await?;

    let mut observed: HashMap<String, (f64, u64)> = HashMap::new();
    while let Some(row) = rows.next().await? {
        observed.insert(
            row.get::<String>(0)?,
            (row.get::<f64>(1)?, row.get::<i64>(2)? as u64),
        );
    }

    Ok(window_bucket_keys(anchor)
        .into_iter()
        .map(|key| {
            let (avg_score, count) = observed.get(&key).copied().unwrap_or((0.0, 0));
            ScoreSeriesPoint { bucket: key, avg_score, count }
        })
        .collect())
}
