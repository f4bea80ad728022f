// [apps/collector/src/bin/forge_models.rs]
/*!
 * =================================================================
 * APARATO: LOCAL MODEL FORGE (V4.0 - BRING-UP UTILITY)
 * CLASIFICACIÓN: OPS UTILITY (ESTRATO L6)
 * RESPONSABILIDAD: FORJA DE UN TRÍO DE ARTEFACTOS COHERENTE
 *
 * # Propósito:
 * Materializa en disco un trío de artefactos listo para el arranque
 * local del Colector. NO es un pipeline de entrenamiento: los
 * parámetros son una calibración heurística estable para entornos de
 * desarrollo y bancos de prueba.
 * =================================================================
 */

use senuelo_domain_ai_cortex::{
    AnomalyArtifact, AnomalyParams, ArtifactSet, Preprocessing, ScalerParams, SecondaryArtifact,
    SecondaryParams, SupervisedArtifact, SupervisedParams, KIND_SECONDARY, KIND_SUPERVISED,
    KIND_UNSUPERVISED,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn action_encoder() -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut action_codes = BTreeMap::new();
    for (label, code) in [
        ("file_access", 1.0),
        ("ci_job_run", 2.0),
        ("scan_attempt", 3.0),
        ("malformed", 4.0),
        ("bruteforce", 5.0),
        ("cred_access", 6.0),
        ("git_push", 7.0),
    ] {
        action_codes.insert(label.to_string(), code);
    }

    let mut encoders = BTreeMap::new();
    encoders.insert("action".to_string(), action_codes);
    encoders
}

fn protocol_encoder() -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut protocol_codes = BTreeMap::new();
    for (label, code) in [("none", 0.0), ("HTTP", 1.0), ("HTTPS", 2.0), ("SSH", 3.0), ("GIT", 4.0)] {
        protocol_codes.insert(label.to_string(), code);
    }

    let mut encoders = BTreeMap::new();
    encoders.insert("protocol".to_string(), protocol_codes);
    encoders
}

fn forge_supervised() -> SupervisedArtifact {
    SupervisedArtifact {
        kind: KIND_SUPERVISED.to_string(),
        name: "gradient-sentinel".to_string(),
        version: "2026.02".to_string(),
        preprocessing: Preprocessing {
            columns: vec![
                "indicator_action".to_string(),
                "indicator_path".to_string(),
                "action".to_string(),
                "payload_bytes".to_string(),
                "path_depth".to_string(),
                "user_agent_length".to_string(),
            ],
            scaler: ScalerParams {
                mean: vec![0.0, 0.0, 3.0, 512.0, 1.0, 64.0],
                scale: vec![1.0, 1.0, 2.0, 2048.0, 2.0, 128.0],
            },
            encoders: action_encoder(),
            unknown_code: -1.0,
        },
        model: SupervisedParams {
            coefficients: vec![2.2, 2.0, 0.45, 0.30, 0.15, -0.05],
            intercept: -1.2,
            decision_threshold: 0.70,
        },
    }
}

fn forge_unsupervised() -> AnomalyArtifact {
    AnomalyArtifact {
        kind: KIND_UNSUPERVISED.to_string(),
        name: "isolation-mirror".to_string(),
        version: "2026.02".to_string(),
        preprocessing: Preprocessing {
            columns: vec![
                "hour_of_day".to_string(),
                "payload_bytes".to_string(),
                "path_depth".to_string(),
                "header_count".to_string(),
                "session_id_length".to_string(),
                "geo_resolved".to_string(),
            ],
            scaler: ScalerParams {
                mean: vec![12.0, 256.0, 1.0, 4.0, 8.0, 0.5],
                scale: vec![6.0, 1024.0, 2.0, 3.0, 6.0, 0.5],
            },
            encoders: BTreeMap::new(),
            unknown_code: -1.0,
        },
        model: AnomalyParams {
            center: vec![0.0; 6],
            dispersion: vec![1.0; 6],
            calibration_scale: 4.0,
            decision_threshold: 0.82,
        },
    }
}

fn forge_secondary() -> SecondaryArtifact {
    SecondaryArtifact {
        kind: KIND_SECONDARY.to_string(),
        name: "traffic-oracle".to_string(),
        version: "2026.02".to_string(),
        preprocessing: Preprocessing {
            columns: vec![
                "user_agent_length".to_string(),
                "header_count".to_string(),
                "source_is_private".to_string(),
                "geo_resolved".to_string(),
                "protocol".to_string(),
            ],
            scaler: ScalerParams {
                mean: vec![64.0, 4.0, 0.0, 0.5, 1.0],
                scale: vec![128.0, 3.0, 1.0, 0.5, 2.0],
            },
            encoders: protocol_encoder(),
            unknown_code: -1.0,
        },
        model: SecondaryParams {
            classes: vec!["NORMAL".to_string(), "TOR".to_string(), "VPN".to_string()],
            coefficients: vec![
                vec![0.40, 0.30, 0.20, 0.35, 0.10],
                vec![-0.45, -0.25, 0.05, -0.30, -0.10],
                vec![-0.20, -0.15, 0.10, -0.20, 0.05],
            ],
            intercepts: vec![1.20, -0.80, -0.60],
            benign_class: "NORMAL".to_string(),
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let supervised_path = PathBuf::from(
        std::env::var("MODEL_SUPERVISED_PATH")
            .unwrap_or_else(|_| "models/supervised_clf.json".into()),
    );
    let unsupervised_path = PathBuf::from(
        std::env::var("MODEL_UNSUPERVISED_PATH")
            .unwrap_or_else(|_| "models/unsupervised_anomaly.json".into()),
    );
    let secondary_path = PathBuf::from(
        std::env::var("MODEL_SECONDARY_PATH")
            .unwrap_or_else(|_| "models/secondary_clf.json".into()),
    );

    let supervised = forge_supervised();
    let unsupervised = forge_unsupervised();
    let secondary = forge_secondary();

    // Validación de formas ANTES de tocar el disco.
    ArtifactSet::from_parts(supervised.clone(), unsupervised.clone(), secondary.clone())?;

    for path in [&supervised_path, &unsupervised_path, &secondary_path] {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&supervised_path, serde_json::to_string_pretty(&supervised)?)?;
    std::fs::write(&unsupervised_path, serde_json::to_string_pretty(&unsupervised)?)?;
    std::fs::write(&secondary_path, serde_json::to_string_pretty(&secondary)?)?;

    println!("🛠️  [FORGE]: Cognitive trio crystallized:");
    println!("   - {}", supervised_path.display());
    println!("   - {}", unsupervised_path.display());
    println!("   - {}", secondary_path.display());

    Ok(())
}
