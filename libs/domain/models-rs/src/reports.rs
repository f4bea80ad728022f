// [libs/domain/models-rs/src/reports.rs]
/*!
 * =================================================================
 * APARATO: ANALYTICAL REPORT CONTRACTS (V6.0 - PANOPTICON SYNC)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DTOs DE AGREGACIÓN CONSUMIDOS POR EL DASHBOARD
 *
 * # Física de Ventana:
 * Toda serie temporal agrupa por hora UTC con clave canónica
 * 'YYYY-MM-DDTHH:00:00Z'. Una ventana de 24 h son las 24 horas
 * consecutivas que terminan en la hora UTC actual (inclusive); una
 * base de datos vacía sigue produciendo 24 cubos a cero.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

/// Punto de serie horaria con puntuación media y volumen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreSeriesPoint {
    /// Clave de cubo 'YYYY-MM-DDTHH:00:00Z' en UTC.
    pub bucket: String,
    pub avg_score: f64,
    pub count: u64,
}

/// Punto de serie horaria de volumen puro.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountSeriesPoint {
    pub bucket: String,
    pub count: u64,
}

/// Entrada de listado top-N: etiqueta y volumen.
/// Orden: volumen descendente, empates por etiqueta lexicográfica.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

/// Histograma fijo por banda de riesgo.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BandHistogram {
    pub minimal: u64,
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Resumen principal del dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_events: u64,
    pub distinct_sources: u64,
    pub events_last_24h: u64,
    pub average_score: f64,
    pub high_risk_count: u64,
    pub anomaly_count: u64,
    pub top_services: Vec<LabelCount>,
    pub top_actions: Vec<LabelCount>,
    pub top_countries: Vec<LabelCount>,
    pub band_histogram: BandHistogram,
    pub hourly_series: Vec<ScoreSeriesPoint>,
}

/// Página de analítica: agregados sobre la ventana de 24 h.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total_24h: u64,
    pub high_risk_24h: u64,
    pub distinct_sources_24h: u64,
    pub average_score_24h: f64,
    pub top_countries: Vec<LabelCount>,
    pub top_sources: Vec<LabelCount>,
    pub top_protocols: Vec<LabelCount>,
    pub time_series: Vec<CountSeriesPoint>,
}

/// Agregación por origen geolocalizado para el mapa de amenazas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapPoint {
    pub source_address: String,
    pub count: u64,
    pub avg_score: f64,
    pub country: Option<String>,
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Origen de alto riesgo listado en la página de ML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceScore {
    pub source_address: String,
    pub avg_score: f64,
    pub count: u64,
}

/// Página de inteligencia del ensamble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlInsightsReport {
    pub average_anomaly_component: f64,
    pub anomaly_count: u64,
    pub hourly_series: Vec<ScoreSeriesPoint>,
    pub top_risk_sources: Vec<SourceScore>,
    pub band_histogram: BandHistogram,
    pub traffic_class_histogram: Vec<LabelCount>,
    pub suspicious_traffic_count: u64,
}

/// Expediente de investigación por dirección de origen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestigationReport {
    pub source_address: String,
    pub total_events: u64,
    pub first_seen: String,
    pub last_seen: String,
    pub average_score: f64,
    pub max_score: f64,
    pub distinct_actions: Vec<String>,
    pub distinct_services: Vec<String>,
    pub hourly_series: Vec<ScoreSeriesPoint>,
    pub events: Vec<crate::event::StoredEvent>,
}
