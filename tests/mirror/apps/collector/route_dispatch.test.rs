// [tests/mirror/apps/collector/route_dispatch.test.rs]
/**
 * =================================================================
 * APARATO: ROUTE DISPATCH CERTIFIER (V5.0 - TOPOLOGY PROOF)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L3)
 * RESPONSABILIDAD: CERTIFICACIÓN DE LA TOPOLOGÍA DE RED DEL COLECTOR
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use senuelo_collector::config::CollectorConfig;
    use senuelo_collector::routes::create_collector_router;
    use senuelo_collector::state::AppState;
    use senuelo_domain_ai_cortex::{
        AnomalyArtifact, AnomalyParams, ArtifactSet, Preprocessing, ScalerParams,
        SecondaryArtifact, SecondaryParams, SupervisedArtifact, SupervisedParams, KIND_SECONDARY,
        KIND_SUPERVISED, KIND_UNSUPERVISED,
    };
    use senuelo_infra_db::TursoClient;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn single_column(column: &str) -> Preprocessing {
        Preprocessing {
            columns: vec![column.to_string()],
            scaler: ScalerParams { mean: vec![0.0], scale: vec![1.0] },
            encoders: BTreeMap::new(),
            unknown_code: -1.0,
        }
    }

    fn neutral_artifacts() -> ArtifactSet {
        ArtifactSet::from_parts(
            SupervisedArtifact {
                kind: KIND_SUPERVISED.to_string(),
                name: "null-sentinel".to_string(),
                version: "test".to_string(),
                preprocessing: single_column("payload_bytes"),
                model: SupervisedParams {
                    coefficients: vec![0.0],
                    intercept: 0.0,
                    decision_threshold: 0.70,
                },
            },
            AnomalyArtifact {
                kind: KIND_UNSUPERVISED.to_string(),
                name: "quiet-mirror".to_string(),
                version: "test".to_string(),
                preprocessing: single_column("payload_bytes"),
                model: AnomalyParams {
                    center: vec![0.0],
                    dispersion: vec![1.0],
                    calibration_scale: 1.0,
                    decision_threshold: 0.90,
                },
            },
            SecondaryArtifact {
                kind: KIND_SECONDARY.to_string(),
                name: "mono-oracle".to_string(),
                version: "test".to_string(),
                preprocessing: single_column("header_count"),
                model: SecondaryParams {
                    classes: vec!["NORMAL".to_string()],
                    coefficients: vec![vec![0.0]],
                    intercepts: vec![0.0],
                    benign_class: "NORMAL".to_string(),
                },
            },
        )
        .expect("CRITICAL_FAULT: Synthetic artifacts must validate.")
    }

    async fn setup_collector_state(database_name: &str) -> AppState {
        let config = CollectorConfig::resolve(|key| match key {
            "GEO_PROVIDER_URL" => Some("http://127.0.0.1:9/json".to_string()),
            "GEO_TIMEOUT_MS" => Some("250".to_string()),
            _ => None,
        })
        .expect("CRITICAL_FAULT: Test configuration must resolve.");

        let database_client = TursoClient::connect(
            &format!("file:{database_name}?mode=memory&cache=shared"),
            None,
        )
        .await
        .expect("CRITICAL_FAULT: Failed to anchor in-memory ledger.");

        AppState::assemble(database_client, neutral_artifacts(), config)
            .expect("CRITICAL_FAULT: State assembly collapsed.")
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn certify_health_probe_reports_component_truth() {
        println!("\n🔍 [AUDIT]: Initiating Health Topology Certification...");

        let application_state = setup_collector_state("route_health").await;
        let collector_router = create_collector_router(application_state);

        let response = collector_router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let report = read_json(response).await;

        assert_eq!(report["status"], "operational");
        assert_eq!(report["store"]["reachable"], true);
        assert_eq!(report["models"]["supervised"]["name"], "null-sentinel");
        assert_eq!(report["models"]["unsupervised"]["loaded"], true);
        assert_eq!(report["models"]["secondary"]["name"], "mono-oracle");
        assert_eq!(report["enrichment_cache"]["capacity"], 50_000);
        assert_eq!(report["write_queue"]["capacity"], 1_000);
        assert!(report["error_counters"]["ingested_ok"].is_u64());
        println!("   ✅ [VERDICT]: Component truth certified.");
    }

    #[tokio::test]
    async fn certify_unknown_routes_and_methods() {
        let application_state = setup_collector_state("route_unknown").await;
        let collector_router = create_collector_router(application_state);

        let ghost = collector_router
            .clone()
            .oneshot(Request::builder().uri("/ghost-strata").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(ghost.status(), StatusCode::NOT_FOUND);

        let wrong_method = collector_router
            .oneshot(Request::builder().method("GET").uri("/ingest").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn certify_historical_log_alias_accepts_events() {
        let application_state = setup_collector_state("route_alias").await;
        let collector_router = create_collector_router(application_state);

        let payload = serde_json::json!({
            "observed_at": "2024-06-01T10:15:00Z",
            "source_address": "203.0.113.42",
            "target_service": "git",
            "action": "file_access",
            "session_id": "alias-session"
        });

        let response = collector_router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/log")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let acknowledgment = read_json(response).await;
        assert_eq!(acknowledgment["accepted"], true);
        assert_eq!(acknowledgment["inserted"], true);
    }
}
