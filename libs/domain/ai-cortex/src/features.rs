// [libs/domain/ai-cortex/src/features.rs]
/*!
 * =================================================================
 * APARATO: FEATURE MATRIX EXTRACTOR (V8.0 - DETERMINISTIC PROJECTION)
 * CLASIFICACIÓN: COGNITIVE DOMAIN (ESTRATO L9)
 * RESPONSABILIDAD: PROYECCIÓN DETERMINISTA EVENTO -> VECTOR NUMÉRICO
 *
 * # Contrato:
 * La misma transformación se aplica en entrenamiento e inferencia.
 * El marco de rasgos es un diccionario nominal; cada artefacto lo
 * proyecta a su propio orden de columnas. Etiquetas categóricas
 * desconocidas reciben el código reservado; numéricos ausentes
 * proyectan a 0. Ninguna entrada provoca excepción.
 * =================================================================
 */

use crate::artifacts::Preprocessing;
use crate::ensemble::IndicatorPolicy;
use chrono::{Datelike, Timelike};
use senuelo_domain_models::{Event, GeoFields};
use std::collections::BTreeMap;

/// Marco de rasgos nominales extraído de un evento enriquecido.
#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    numeric: BTreeMap<String, f64>,
    categorical: BTreeMap<String, String>,
}

impl FeatureFrame {
    /// Extrae el marco completo. Los indicadores configurados se
    /// materializan como columnas para que alcancen a los modelos;
    /// la decisión final del piso de puntuación no ocurre aquí.
    pub fn extract(event: &Event, geo: &GeoFields, policy: &IndicatorPolicy) -> Self {
        let mut numeric = BTreeMap::new();
        let mut categorical = BTreeMap::new();

        // --- ESTRATO TEMPORAL ---
        numeric.insert("hour_of_day".into(), f64::from(event.observed_at.hour()));
        numeric.insert(
            "day_of_week".into(),
            f64::from(event.observed_at.weekday().num_days_from_monday()),
        );

        // --- ESTRATO LÉXICO (RUTA OBJETIVO) ---
        let path = event.target_path.as_deref().unwrap_or("");
        numeric.insert("path_length".into(), path.len() as f64);
        numeric.insert(
            "path_depth".into(),
            path.matches('/').count() as f64,
        );
        numeric.insert(
            "path_is_hidden".into(),
            flag(path.split('/').next_back().is_some_and(|leaf| leaf.starts_with('.'))),
        );

        // --- ESTRATO DE CARGA ---
        numeric.insert(
            "payload_bytes".into(),
            event.payload_json.as_deref().map_or(0.0, |raw| raw.len() as f64),
        );
        numeric.insert(
            "header_count".into(),
            event.headers.as_ref().map_or(0.0, |map| map.len() as f64),
        );
        numeric.insert(
            "user_agent_length".into(),
            event.user_agent.as_deref().map_or(0.0, |ua| ua.len() as f64),
        );
        numeric.insert("session_id_length".into(), event.session_id.len() as f64);

        // --- ESTRATO GEOGRÁFICO ---
        numeric.insert("source_is_private".into(), flag(geo.is_private));
        numeric.insert("geo_resolved".into(), flag(geo.has_coordinates()));

        // --- COLUMNAS DE INDICADORES (AUMENTO HEURÍSTICO) ---
        numeric.insert(
            "indicator_action".into(),
            flag(policy.matches_action(&event.action)),
        );
        numeric.insert(
            "indicator_path".into(),
            flag(policy.matches_path(event.target_path.as_deref())),
        );

        // --- ESTRATO CATEGÓRICO ---
        categorical.insert("action".into(), event.action.clone());
        categorical.insert("target_service".into(), event.target_service.clone());
        categorical.insert(
            "protocol".into(),
            event.protocol.clone().unwrap_or_else(|| "none".to_string()),
        );
        categorical.insert(
            "geo_country".into(),
            geo.country.clone().unwrap_or_else(|| "unknown".to_string()),
        );

        Self { numeric, categorical }
    }

    pub fn numeric(&self, column: &str) -> Option<f64> {
        self.numeric.get(column).copied()
    }

    pub fn categorical(&self, column: &str) -> Option<&str> {
        self.categorical.get(column).map(String::as_str)
    }
}

/// Proyecta el marco al orden de columnas de un artefacto y aplica su
/// escalador estándar. Longitud y orden de salida son exactamente
/// `preprocessing.columns`.
pub fn featurize(frame: &FeatureFrame, preprocessing: &Preprocessing) -> Vec<f64> {
    preprocessing
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let raw = resolve_column(frame, preprocessing, column);
            let mean = preprocessing.scaler.mean.get(index).copied().unwrap_or(0.0);
            let scale = preprocessing.scaler.scale.get(index).copied().unwrap_or(1.0);
            if scale > 0.0 {
                (raw - mean) / scale
            } else {
                raw - mean
            }
        })
        .collect()
}

fn flag(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

fn resolve_column(frame: &FeatureFrame, preprocessing: &Preprocessing, column: &str) -> f64 {
    if let Some(encoder) = preprocessing.encoders.get(column) {
        let label = frame.categorical(column).unwrap_or("unknown");
        return encoder
            .get(label)
            .copied()
            .unwrap_or(preprocessing.unknown_code);
    }
    frame.numeric(column).unwrap_or(0.0)
}
