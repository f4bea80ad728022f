// [libs/domain/ai-cortex/src/artifacts.rs]
/*!
 * =================================================================
 * APARATO: MODEL ARTIFACT VAULT (V6.0 - IMMUTABLE STRATA)
 * CLASIFICACIÓN: COGNITIVE DOMAIN (ESTRATO L9)
 * RESPONSABILIDAD: CARGA Y VALIDACIÓN DE ARTEFACTOS ENTRENADOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. PORTABLE FORMAT: Los artefactos son JSON autocontenidos con su
 *    propio estado de preprocesamiento (columnas, escaladores y
 *    codificadores categóricos). Ningún runtime de ML externo.
 * 2. FAIL FAST: Toda violación de forma se detecta en el arranque;
 *    el proceso rehúsa arrancar con un artefacto incoherente.
 * 3. IMMUTABILITY: El trío se carga una vez y se comparte vía Arc
 *    sin cerrojos durante toda la vida del proceso.
 * =================================================================
 */

use crate::errors::CortexError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub const KIND_SUPERVISED: &str = "SUPERVISED_CLF";
pub const KIND_UNSUPERVISED: &str = "UNSUPERVISED_ANOMALY";
pub const KIND_SECONDARY: &str = "SECONDARY_CLF";

/// Parámetros del escalador estándar por columna.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Estado de preprocesamiento embebido en cada artefacto.
/// Se trata como opaco: la implementación solo lee columnas,
/// escaladores y tablas de codificación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessing {
    /// Orden de columnas del vector de entrada del modelo.
    pub columns: Vec<String>,
    pub scaler: ScalerParams,
    /// Tablas ordinales por columna categórica: etiqueta -> código.
    #[serde(default)]
    pub encoders: BTreeMap<String, BTreeMap<String, f64>>,
    /// Código reservado para etiquetas categóricas desconocidas.
    #[serde(default = "default_unknown_code")]
    pub unknown_code: f64,
}

fn default_unknown_code() -> f64 {
    -1.0
}

impl Preprocessing {
    fn validate(&self, origin: &str) -> Result<(), CortexError> {
        if self.columns.is_empty() {
            return Err(CortexError::ShapeMismatch {
                detail: format!("{origin}: empty column list"),
            });
        }
        if self.scaler.mean.len() != self.columns.len()
            || self.scaler.scale.len() != self.columns.len()
        {
            return Err(CortexError::ShapeMismatch {
                detail: format!(
                    "{origin}: scaler dimensions {}x{} vs {} columns",
                    self.scaler.mean.len(),
                    self.scaler.scale.len(),
                    self.columns.len()
                ),
            });
        }
        Ok(())
    }
}

/// Regresión logística binaria: probabilidad de malicia.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisedParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Umbral de decisión propio del clasificador.
    pub decision_threshold: f64,
}

/// Detector de desviación diagonal: distancia normalizada al centroide
/// del tráfico de entrenamiento en el espacio ya escalado.
/// La puntuación cruda se normaliza a [0,1) con
/// `1 - exp(-raw / calibration_scale)`; mayor = más anómalo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyParams {
    pub center: Vec<f64>,
    pub dispersion: Vec<f64>,
    pub calibration_scale: f64,
    /// Umbral sobre la puntuación ya normalizada.
    pub decision_threshold: f64,
}

/// Regresión logística multinomial para la clase de tráfico.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryParams {
    pub classes: Vec<String>,
    /// Una fila de coeficientes por clase, en el orden de `classes`.
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    /// Clase considerada benigna; p_t = 1 - P(benign_class).
    pub benign_class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisedArtifact {
    pub kind: String,
    pub name: String,
    pub version: String,
    pub preprocessing: Preprocessing,
    pub model: SupervisedParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyArtifact {
    pub kind: String,
    pub name: String,
    pub version: String,
    pub preprocessing: Preprocessing,
    pub model: AnomalyParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryArtifact {
    pub kind: String,
    pub name: String,
    pub version: String,
    pub preprocessing: Preprocessing,
    pub model: SecondaryParams,
}

/// El trío inmutable de artefactos cargado en el arranque.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub supervised: SupervisedArtifact,
    pub unsupervised: AnomalyArtifact,
    pub secondary: SecondaryArtifact,
}

impl ArtifactSet {
    /// Carga y valida el trío completo. Cualquier fallo aborta el arranque.
    pub fn load(
        supervised_path: &Path,
        unsupervised_path: &Path,
        secondary_path: &Path,
    ) -> Result<Self, CortexError> {
        let supervised: SupervisedArtifact = read_artifact(supervised_path)?;
        ensure_kind(supervised_path, KIND_SUPERVISED, &supervised.kind)?;
        validate_supervised(&supervised)?;

        let unsupervised: AnomalyArtifact = read_artifact(unsupervised_path)?;
        ensure_kind(unsupervised_path, KIND_UNSUPERVISED, &unsupervised.kind)?;
        validate_anomaly(&unsupervised)?;

        let secondary: SecondaryArtifact = read_artifact(secondary_path)?;
        ensure_kind(secondary_path, KIND_SECONDARY, &secondary.kind)?;
        validate_secondary(&secondary)?;

        info!(
            "🧠 [ARTIFACT_VAULT]: Cognitive trio anchored -> [{} {}] [{} {}] [{} {}]",
            supervised.name,
            supervised.version,
            unsupervised.name,
            unsupervised.version,
            secondary.name,
            secondary.version
        );

        Ok(Self { supervised, unsupervised, secondary })
    }

    /// Ensambla un trío ya materializado validando sus formas.
    /// Vía de entrada del forjador local y de los bancos de prueba.
    pub fn from_parts(
        supervised: SupervisedArtifact,
        unsupervised: AnomalyArtifact,
        secondary: SecondaryArtifact,
    ) -> Result<Self, CortexError> {
        validate_supervised(&supervised)?;
        validate_anomaly(&unsupervised)?;
        validate_secondary(&secondary)?;
        Ok(Self { supervised, unsupervised, secondary })
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CortexError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CortexError::ArtifactUnreadable {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|fault| CortexError::ArtifactMalformed {
        path: path.display().to_string(),
        detail: fault.to_string(),
    })
}

fn ensure_kind(path: &Path, expected: &'static str, found: &str) -> Result<(), CortexError> {
    if found != expected {
        return Err(CortexError::KindMismatch {
            path: path.display().to_string(),
            expected,
            found: found.to_string(),
        });
    }
    Ok(())
}

fn validate_supervised(artifact: &SupervisedArtifact) -> Result<(), CortexError> {
    artifact.preprocessing.validate(&artifact.name)?;
    if artifact.model.coefficients.len() != artifact.preprocessing.columns.len() {
        return Err(CortexError::ShapeMismatch {
            detail: format!(
                "{}: {} coefficients vs {} columns",
                artifact.name,
                artifact.model.coefficients.len(),
                artifact.preprocessing.columns.len()
            ),
        });
    }
    if !(0.0..=1.0).contains(&artifact.model.decision_threshold) {
        return Err(CortexError::ShapeMismatch {
            detail: format!(
                "{}: decision threshold {} outside [0,1]",
                artifact.name, artifact.model.decision_threshold
            ),
        });
    }
    Ok(())
}

fn validate_anomaly(artifact: &AnomalyArtifact) -> Result<(), CortexError> {
    artifact.preprocessing.validate(&artifact.name)?;
    let columns = artifact.preprocessing.columns.len();
    if artifact.model.center.len() != columns || artifact.model.dispersion.len() != columns {
        return Err(CortexError::ShapeMismatch {
            detail: format!(
                "{}: center/dispersion {}x{} vs {} columns",
                artifact.name,
                artifact.model.center.len(),
                artifact.model.dispersion.len(),
                columns
            ),
        });
    }
    if artifact.model.dispersion.iter().any(|d| *d <= 0.0) {
        return Err(CortexError::ShapeMismatch {
            detail: format!("{}: non-positive dispersion entry", artifact.name),
        });
    }
    if artifact.model.calibration_scale <= 0.0 {
        return Err(CortexError::ShapeMismatch {
            detail: format!("{}: non-positive calibration scale", artifact.name),
        });
    }
    if !(0.0..=1.0).contains(&artifact.model.decision_threshold) {
        return Err(CortexError::ShapeMismatch {
            detail: format!(
                "{}: decision threshold {} outside [0,1]",
                artifact.name, artifact.model.decision_threshold
            ),
        });
    }
    Ok(())
}

fn validate_secondary(artifact: &SecondaryArtifact) -> Result<(), CortexError> {
    artifact.preprocessing.validate(&artifact.name)?;
    let class_count = artifact.model.classes.len();
    if class_count == 0 {
        return Err(CortexError::ShapeMismatch {
            detail: format!("{}: empty class list", artifact.name),
        });
    }
    if artifact.model.coefficients.len() != class_count
        || artifact.model.intercepts.len() != class_count
    {
        return Err(CortexError::ShapeMismatch {
            detail: format!(
                "{}: {} coefficient rows / {} intercepts vs {} classes",
                artifact.name,
                artifact.model.coefficients.len(),
                artifact.model.intercepts.len(),
                class_count
            ),
        });
    }
    for (index, row) in artifact.model.coefficients.iter().enumerate() {
        if row.len() != artifact.preprocessing.columns.len() {
            return Err(CortexError::ShapeMismatch {
                detail: format!(
                    "{}: coefficient row {} has {} entries vs {} columns",
                    artifact.name,
                    index,
                    row.len(),
                    artifact.preprocessing.columns.len()
                ),
            });
        }
    }
    if !artifact.model.classes.contains(&artifact.model.benign_class) {
        return Err(CortexError::ShapeMismatch {
            detail: format!(
                "{}: benign class '{}' absent from class list",
                artifact.name, artifact.model.benign_class
            ),
        });
    }
    Ok(())
}
