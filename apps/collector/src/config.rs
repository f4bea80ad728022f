// [apps/collector/src/config.rs]
/*!
 * =================================================================
 * APARATO: COLLECTOR CONFIGURATION (V8.0 - TYPED ENVIRONMENT)
 * CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L1-APP)
 * RESPONSABILIDAD: CAPTURA TIPADA Y VALIDADA DEL ENTORNO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE READ: El entorno se lee una única vez en el arranque
 *    hacia una estructura inmutable compartida vía Arc.
 * 2. FAIL FAST: Valores incoherentes (pesos que no suman la unidad,
 *    escalera de bandas invertida) abortan con código de salida 1.
 * 3. TESTABILITY: La resolución acepta cualquier diccionario de
 *    entorno; el binario inyecta std::env::var.
 * =================================================================
 */

use senuelo_domain_models::BandCutoffs;
use senuelo_domain_ai_cortex::{EnsembleWeights, IndicatorPolicy};
use senuelo_infra_geo::GeoEnricherConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("[L1_CONFIG_FAULT]: UNPARSEABLE_VALUE -> {key}: {detail}")]
    Invalid { key: &'static str, detail: String },

    #[error("[L1_CONFIG_FAULT]: WEIGHT_SUM_VIOLATION -> {actual} (weights must total 1.0)")]
    WeightSum { actual: f64 },

    #[error("[L1_CONFIG_FAULT]: BAND_LADDER_INCOHERENT -> low {low} / medium {medium} / high {high}")]
    BandLadder { low: f64, medium: f64, high: f64 },

    #[error("[L1_CONFIG_FAULT]: SCORE_FLOOR_OUT_OF_RANGE -> {actual}")]
    FloorRange { actual: f64 },
}

/// Configuración completa e inmutable del Colector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub supervised_model_path: PathBuf,
    pub unsupervised_model_path: PathBuf,
    pub secondary_model_path: PathBuf,
    pub ensemble_weights: EnsembleWeights,
    pub band_cutoffs: BandCutoffs,
    pub indicator_policy: IndicatorPolicy,
    pub geo: GeoEnricherConfig,
    pub request_deadline: Duration,
    pub backpressure_high_watermark: usize,
}

impl CollectorConfig {
    /// Captura el entorno del proceso. Única lectura en todo el ciclo de vida.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resuelve la configuración desde cualquier diccionario de entorno.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_address = parse_or(&lookup, "BIND_ADDRESS", "0.0.0.0:8181")?;

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "file:senuelo_events.db".to_string());

        let supervised_model_path = PathBuf::from(
            lookup("MODEL_SUPERVISED_PATH").unwrap_or_else(|| "models/supervised_clf.json".into()),
        );
        let unsupervised_model_path = PathBuf::from(
            lookup("MODEL_UNSUPERVISED_PATH")
                .unwrap_or_else(|| "models/unsupervised_anomaly.json".into()),
        );
        let secondary_model_path = PathBuf::from(
            lookup("MODEL_SECONDARY_PATH").unwrap_or_else(|| "models/secondary_clf.json".into()),
        );

        let ensemble_weights = EnsembleWeights {
            supervised: parse_or(&lookup, "MODEL_WEIGHT_SUPERVISED", "0.60")?,
            anomaly: parse_or(&lookup, "MODEL_WEIGHT_UNSUPERVISED", "0.25")?,
            secondary: parse_or(&lookup, "MODEL_WEIGHT_SECONDARY", "0.15")?,
        };
        let weight_sum =
            ensemble_weights.supervised + ensemble_weights.anomaly + ensemble_weights.secondary;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum { actual: weight_sum });
        }

        let band_cutoffs = BandCutoffs {
            low: parse_or(&lookup, "BAND_LOW", "0.20")?,
            medium: parse_or(&lookup, "BAND_MEDIUM", "0.40")?,
            high: parse_or(&lookup, "BAND_HIGH", "0.70")?,
        };
        if !band_cutoffs.is_coherent() {
            return Err(ConfigError::BandLadder {
                low: band_cutoffs.low,
                medium: band_cutoffs.medium,
                high: band_cutoffs.high,
            });
        }

        let score_floor: f64 = parse_or(&lookup, "SCORE_FLOOR", "0.65")?;
        if !(0.0..=1.0).contains(&score_floor) {
            return Err(ConfigError::FloorRange { actual: score_floor });
        }

        let default_policy = IndicatorPolicy::default();
        let indicator_policy = IndicatorPolicy {
            indicator_actions: parse_list(
                lookup("INDICATOR_ACTIONS"),
                default_policy.indicator_actions,
            ),
            indicator_paths: parse_list(
                lookup("INDICATOR_PATHS"),
                default_policy.indicator_paths,
            ),
            score_floor,
        };

        let geo = GeoEnricherConfig {
            provider_base_url: lookup("GEO_PROVIDER_URL")
                .unwrap_or_else(|| "http://ip-api.com/json".to_string()),
            lookup_timeout: Duration::from_millis(parse_or(&lookup, "GEO_TIMEOUT_MS", "2000")?),
            concurrency: parse_or(&lookup, "GEO_CONCURRENCY", "16")?,
            acquire_budget: Duration::from_millis(parse_or(
                &lookup,
                "GEO_ACQUIRE_BUDGET_MS",
                "500",
            )?),
            cache_capacity: parse_or(&lookup, "GEO_CACHE_SIZE", "50000")?,
            positive_ttl: Duration::from_secs(parse_or(
                &lookup,
                "GEO_POSITIVE_TTL_SECONDS",
                "86400",
            )?),
            negative_ttl: Duration::from_secs(parse_or(
                &lookup,
                "GEO_NEGATIVE_TTL_SECONDS",
                "300",
            )?),
        };

        let request_deadline =
            Duration::from_millis(parse_or(&lookup, "REQUEST_DEADLINE_MS", "5000")?);

        let backpressure_high_watermark =
            parse_or(&lookup, "BACKPRESSURE_HIGH_WATERMARK", "1000")?;

        Ok(Self {
            bind_address,
            database_url,
            supervised_model_path,
            unsupervised_model_path,
            secondary_model_path,
            ensemble_weights,
            band_cutoffs,
            indicator_policy,
            geo,
            request_deadline,
            backpressure_high_watermark,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim().parse::<T>().map_err(|fault| ConfigError::Invalid {
        key,
        detail: format!("'{}' ({})", raw, fault),
    })
}

fn parse_list(raw: Option<String>, default: Vec<String>) -> Vec<String> {
    match raw {
        None => default,
        Some(joined) => {
            let entries: Vec<String> = joined
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
            if entries.is_empty() {
                default
            } else {
                entries
            }
        }
    }
}
