// [libs/domain/ai-cortex/src/ensemble.rs]
/*!
 * =================================================================
 * APARATO: RISK ENSEMBLE ENGINE (V11.0 - TRIAD VERDICT)
 * CLASIFICACIÓN: COGNITIVE DOMAIN (ESTRATO L9)
 * RESPONSABILIDAD: VEREDICTO COMBINADO DE LOS TRES MODELOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. TRIAD BLEND: value = w_s·p_s + w_a·p_a + w_t·p_t sobre el trío
 *    supervisado / anomalía / secundario.
 * 2. POLICY FLOOR: Los indicadores configurados imponen un piso de
 *    puntuación tras la suma ponderada y antes de la banda.
 * 3. GRACEFUL DEGRADATION: Un modelo caído aporta cero y marca
 *    'scoring_degraded'; el evento persiste siempre.
 * 4. PURE INFERENCE: Funciones puras de (vector, artefacto); ejecución
 *    concurrente sin cerrojos sobre el trío inmutable.
 * =================================================================
 */

use crate::artifacts::ArtifactSet;
use crate::errors::CortexError;
use crate::features::{featurize, FeatureFrame};
use senuelo_domain_models::{BandCutoffs, Event, GeoFields, PredictedClass, RiskBand, ScoreVerdict};
use std::sync::Arc;
use tracing::warn;

/// Etiqueta de tráfico emitida cuando el clasificador secundario no
/// pudo ejecutarse.
pub const TRAFFIC_CLASS_UNKNOWN: &str = "UNKNOWN";

/// Acciones cuya semántica sugiere inyección o push de código.
const EXPLOIT_ACTIONS: &[&str] = &["git_push"];
/// Acciones de acceso directo a material de credenciales.
const CREDENTIAL_ACTIONS: &[&str] = &["cred_access"];
/// Acciones de sondeo y reconocimiento.
const RECON_ACTIONS: &[&str] = &["scan_attempt", "bruteforce"];
/// Marcadores de exfiltración sobre ficheros sensibles no credenciales.
const EXFIL_PATH_MARKERS: &[&str] = &["backup", "dump", ".sql", ".sqlite", "database", ".tar"];

/// Pesos de la mezcla; deben sumar la unidad.
#[derive(Debug, Clone, Copy)]
pub struct EnsembleWeights {
    pub supervised: f64,
    pub anomaly: f64,
    pub secondary: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self { supervised: 0.60, anomaly: 0.25, secondary: 0.15 }
    }
}

impl EnsembleWeights {
    pub fn validate(&self) -> Result<(), CortexError> {
        let sum = self.supervised + self.anomaly + self.secondary;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(CortexError::WeightSumViolation { actual: sum });
        }
        Ok(())
    }
}

/// Política de indicadores: garantía operativa, no propiedad del modelo.
#[derive(Debug, Clone)]
pub struct IndicatorPolicy {
    /// Acciones que disparan el piso de puntuación.
    pub indicator_actions: Vec<String>,
    /// Subcadenas de ruta que disparan el piso de puntuación.
    pub indicator_paths: Vec<String>,
    /// Piso aplicado tras la suma ponderada.
    pub score_floor: f64,
}

impl Default for IndicatorPolicy {
    fn default() -> Self {
        Self {
            indicator_actions: vec!["git_push".to_string(), "cred_access".to_string()],
            indicator_paths: vec![
                ".env".to_string(),
                "secrets.yml".to_string(),
                "credentials".to_string(),
                "private.key".to_string(),
                "kubeconfig".to_string(),
            ],
            score_floor: 0.65,
        }
    }
}

impl IndicatorPolicy {
    pub fn matches_action(&self, action: &str) -> bool {
        self.indicator_actions.iter().any(|candidate| candidate == action)
    }

    pub fn matches_path(&self, path: Option<&str>) -> bool {
        let Some(path) = path else { return false };
        let lowered = path.to_lowercase();
        self.indicator_paths
            .iter()
            .any(|marker| lowered.contains(&marker.to_lowercase()))
    }

    pub fn triggered(&self, event: &Event) -> bool {
        self.matches_action(&event.action) || self.matches_path(event.target_path.as_deref())
    }
}

/// Motor de inferencia del trío. Inmutable tras el arranque.
pub struct EnsembleEngine {
    artifacts: Arc<ArtifactSet>,
    weights: EnsembleWeights,
    cutoffs: BandCutoffs,
    policy: IndicatorPolicy,
}

impl EnsembleEngine {
    pub fn new(
        artifacts: Arc<ArtifactSet>,
        weights: EnsembleWeights,
        cutoffs: BandCutoffs,
        policy: IndicatorPolicy,
    ) -> Result<Self, CortexError> {
        weights.validate()?;
        Ok(Self { artifacts, weights, cutoffs, policy })
    }

    pub fn policy(&self) -> &IndicatorPolicy {
        &self.policy
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    /// Calcula el veredicto completo de un evento enriquecido.
    /// Nunca falla: los colapsos por modelo degradan, no abortan.
    pub fn score(&self, event: &Event, geo: &GeoFields) -> ScoreVerdict {
        let frame = FeatureFrame::extract(event, geo, &self.policy);

        let supervised_outcome = self.run_supervised(&frame);
        let anomaly_outcome = self.run_anomaly(&frame);
        let secondary_outcome = self.run_secondary(&frame);

        let mut failed_components = 0usize;

        let (supervised_probability, supervised_flagged) = match supervised_outcome {
            Ok(outcome) => outcome,
            Err(fault) => {
                warn!("⚠️ [ENSEMBLE]: Supervised component collapsed: {}", fault);
                failed_components += 1;
                (0.0, false)
            }
        };

        let (anomaly_component, anomaly_flagged) = match anomaly_outcome {
            Ok(outcome) => outcome,
            Err(fault) => {
                warn!("⚠️ [ENSEMBLE]: Anomaly component collapsed: {}", fault);
                failed_components += 1;
                (0.0, false)
            }
        };

        let (secondary_probability, traffic_class) = match secondary_outcome {
            Ok(outcome) => outcome,
            Err(fault) => {
                warn!("⚠️ [ENSEMBLE]: Secondary component collapsed: {}", fault);
                failed_components += 1;
                (0.0, TRAFFIC_CLASS_UNKNOWN.to_string())
            }
        };

        let scoring_degraded = failed_components > 0;

        // Colapso total del trío: veredicto neutro, el evento persiste.
        if failed_components == 3 {
            return ScoreVerdict {
                value: 0.0,
                band: RiskBand::Minimal,
                is_anomaly: false,
                predicted_class: PredictedClass::Benign,
                traffic_class,
                anomaly_component: 0.0,
                scoring_degraded,
            };
        }

        let mut value = self.weights.supervised * supervised_probability
            + self.weights.anomaly * anomaly_component
            + self.weights.secondary * secondary_probability;

        // Piso de puntuación: tras la suma ponderada, antes de la banda.
        let indicator_hit = self.policy.triggered(event);
        if indicator_hit && value < self.policy.score_floor {
            value = self.policy.score_floor;
        }
        value = value.clamp(0.0, 1.0);

        let band = RiskBand::classify(value, &self.cutoffs);
        let is_anomaly = anomaly_flagged || band == RiskBand::High || supervised_flagged;
        let predicted_class = self.classify(event, supervised_flagged, anomaly_flagged);

        ScoreVerdict {
            value,
            band,
            is_anomaly,
            predicted_class,
            traffic_class,
            anomaly_component,
            scoring_degraded,
        }
    }

    /// Taxonomía de clase predicha. Las reglas de indicadores (cuatro
    /// primeras) priman sobre las etiquetas derivadas solo de modelos.
    fn classify(
        &self,
        event: &Event,
        supervised_flagged: bool,
        anomaly_flagged: bool,
    ) -> PredictedClass {
        let action = event.action.as_str();
        let path = event.target_path.as_deref();

        if EXPLOIT_ACTIONS.contains(&action) {
            return PredictedClass::Exploit;
        }
        if CREDENTIAL_ACTIONS.contains(&action) || self.policy.matches_path(path) {
            return PredictedClass::CredentialAccess;
        }
        if let Some(path) = path {
            let lowered = path.to_lowercase();
            if EXFIL_PATH_MARKERS.iter().any(|marker| lowered.contains(marker)) {
                return PredictedClass::DataExfil;
            }
        }
        if RECON_ACTIONS.contains(&action) {
            return PredictedClass::Recon;
        }
        if supervised_flagged {
            return PredictedClass::KnownMalicious;
        }
        if anomaly_flagged {
            return PredictedClass::UnknownAnomaly;
        }
        PredictedClass::Benign
    }

    fn run_supervised(&self, frame: &FeatureFrame) -> Result<(f64, bool), CortexError> {
        let artifact = &self.artifacts.supervised;
        let vector = featurize(frame, &artifact.preprocessing);

        if vector.len() != artifact.model.coefficients.len() {
            return Err(CortexError::InferenceFault {
                model: "supervised",
                detail: format!(
                    "input vector {} vs {} coefficients",
                    vector.len(),
                    artifact.model.coefficients.len()
                ),
            });
        }

        let activation: f64 = vector
            .iter()
            .zip(artifact.model.coefficients.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + artifact.model.intercept;

        let probability = sigmoid(activation);
        if !probability.is_finite() {
            return Err(CortexError::InferenceFault {
                model: "supervised",
                detail: "non-finite activation".to_string(),
            });
        }

        Ok((probability, probability >= artifact.model.decision_threshold))
    }

    fn run_anomaly(&self, frame: &FeatureFrame) -> Result<(f64, bool), CortexError> {
        let artifact = &self.artifacts.unsupervised;
        let vector = featurize(frame, &artifact.preprocessing);

        if vector.len() != artifact.model.center.len() {
            return Err(CortexError::InferenceFault {
                model: "unsupervised",
                detail: format!(
                    "input vector {} vs {} centroid entries",
                    vector.len(),
                    artifact.model.center.len()
                ),
            });
        }

        let raw_distance: f64 = vector
            .iter()
            .zip(artifact.model.center.iter().zip(artifact.model.dispersion.iter()))
            .map(|(x, (center, dispersion))| {
                let deviation = (x - center) / dispersion;
                deviation * deviation
            })
            .sum::<f64>()
            / vector.len() as f64;

        if !raw_distance.is_finite() {
            return Err(CortexError::InferenceFault {
                model: "unsupervised",
                detail: "non-finite deviation".to_string(),
            });
        }

        // Normalización monótona a [0,1): mayor distancia = más anómalo.
        let normalized = 1.0 - (-raw_distance / artifact.model.calibration_scale).exp();
        Ok((normalized, normalized >= artifact.model.decision_threshold))
    }

    fn run_secondary(&self, frame: &FeatureFrame) -> Result<(f64, String), CortexError> {
        let artifact = &self.artifacts.secondary;
        let vector = featurize(frame, &artifact.preprocessing);

        let mut logits = Vec::with_capacity(artifact.model.classes.len());
        for (row, intercept) in artifact
            .model
            .coefficients
            .iter()
            .zip(artifact.model.intercepts.iter())
        {
            if row.len() != vector.len() {
                return Err(CortexError::InferenceFault {
                    model: "secondary",
                    detail: format!("input vector {} vs {} row entries", vector.len(), row.len()),
                });
            }
            let logit: f64 =
                vector.iter().zip(row.iter()).map(|(x, w)| x * w).sum::<f64>() + intercept;
            logits.push(logit);
        }

        let probabilities = softmax(&logits);
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(CortexError::InferenceFault {
                model: "secondary",
                detail: "non-finite probability mass".to_string(),
            });
        }

        let (winning_index, _) = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(CortexError::InferenceFault {
                model: "secondary",
                detail: "empty probability vector".to_string(),
            })?;

        let benign_index = artifact
            .model
            .classes
            .iter()
            .position(|class| class == &artifact.model.benign_class)
            .unwrap_or(0);

        let suspicious_mass = 1.0 - probabilities[benign_index];
        let label = artifact.model.classes[winning_index].clone();

        Ok((suspicious_mass, label))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let peak = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exponentials: Vec<f64> = logits.iter().map(|logit| (logit - peak).exp()).collect();
    let mass: f64 = exponentials.iter().sum();
    exponentials.iter().map(|value| value / mass).collect()
}
