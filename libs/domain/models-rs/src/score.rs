// [libs/domain/models-rs/src/score.rs]
/*!
 * =================================================================
 * APARATO: RISK VERDICT CONTRACT (V5.2 - BAND TOTALITY)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN DEL VEREDICTO DE RIESGO Y SUS BANDAS
 *
 * # Invariante de Banda:
 * La banda es una función total y determinista del valor numérico:
 * cualquier f64 finito en [0,1] cae exactamente en una banda.
 * =================================================================
 */

use serde::{Deserialize, Serialize};

/// Nivel de riesgo discreto derivado del valor numérico del ensamble.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    Minimal,
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Asignación de banda: función total del valor combinado.
    pub fn classify(value: f64, cutoffs: &BandCutoffs) -> Self {
        if value >= cutoffs.high {
            RiskBand::High
        } else if value >= cutoffs.medium {
            RiskBand::Medium
        } else if value >= cutoffs.low {
            RiskBand::Low
        } else {
            RiskBand::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Minimal => "MINIMAL",
            RiskBand::Low => "LOW",
            RiskBand::Medium => "MEDIUM",
            RiskBand::High => "HIGH",
        }
    }

    /// Decodificación desde la representación almacenada en el Ledger.
    pub fn from_stored(label: &str) -> Self {
        match label {
            "HIGH" => RiskBand::High,
            "MEDIUM" => RiskBand::Medium,
            "LOW" => RiskBand::Low,
            _ => RiskBand::Minimal,
        }
    }
}

/// Puntos de corte configurables de la escalera de bandas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BandCutoffs {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for BandCutoffs {
    fn default() -> Self {
        Self { low: 0.20, medium: 0.40, high: 0.70 }
    }
}

impl BandCutoffs {
    /// Los cortes deben ascender estrictamente dentro de (0,1).
    pub fn is_coherent(&self) -> bool {
        self.low > 0.0 && self.low < self.medium && self.medium < self.high && self.high < 1.0
    }
}

/// Taxonomía de clasificación del ataque predicho.
/// Las cuatro primeras variantes provienen de reglas de indicadores y
/// tienen prioridad sobre las etiquetas derivadas solo de modelos.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictedClass {
    /// La acción sugiere inyección o push de código.
    Exploit,
    /// Acceso a rutas portadoras de credenciales.
    CredentialAccess,
    /// Acceso a otros ficheros sensibles.
    DataExfil,
    /// Acciones de escaneo o sondeo.
    Recon,
    /// El modelo supervisado superó su umbral sin indicador asociado.
    KnownMalicious,
    /// Solo el detector no supervisado levantó bandera.
    UnknownAnomaly,
    /// Ninguna señal de malicia.
    Benign,
}

impl PredictedClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictedClass::Exploit => "EXPLOIT",
            PredictedClass::CredentialAccess => "CREDENTIAL_ACCESS",
            PredictedClass::DataExfil => "DATA_EXFIL",
            PredictedClass::Recon => "RECON",
            PredictedClass::KnownMalicious => "KNOWN_MALICIOUS",
            PredictedClass::UnknownAnomaly => "UNKNOWN_ANOMALY",
            PredictedClass::Benign => "BENIGN",
        }
    }

    pub fn from_stored(label: &str) -> Self {
        match label {
            "EXPLOIT" => PredictedClass::Exploit,
            "CREDENTIAL_ACCESS" => PredictedClass::CredentialAccess,
            "DATA_EXFIL" => PredictedClass::DataExfil,
            "RECON" => PredictedClass::Recon,
            "KNOWN_MALICIOUS" => PredictedClass::KnownMalicious,
            "UNKNOWN_ANOMALY" => PredictedClass::UnknownAnomaly,
            _ => PredictedClass::Benign,
        }
    }
}

/// Veredicto completo del ensamble para un evento individual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreVerdict {
    /// Valor combinado en [0,1].
    pub value: f64,
    /// Banda discreta derivada de `value`.
    pub band: RiskBand,
    /// Bandera de anomalía (detector no supervisado, banda HIGH o
    /// umbral propio del supervisado).
    pub is_anomaly: bool,
    /// Clase de ataque predicha según la taxonomía de prioridad.
    pub predicted_class: PredictedClass,
    /// Etiqueta del clasificador secundario, transportada tal cual
    /// la emite el artefacto (p. ej. NORMAL, TOR, VPN).
    pub traffic_class: String,
    /// Componente de anomalía normalizado aportado por el detector.
    pub anomaly_component: f64,
    /// Uno o más modelos no pudieron ejecutarse para este evento.
    pub scoring_degraded: bool,
}
