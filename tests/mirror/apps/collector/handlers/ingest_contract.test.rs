// [tests/mirror/apps/collector/handlers/ingest_contract.test.rs]
/**
 * =================================================================
 * APARATO: INGEST CONTRACT CERTIFIER (V6.0 - HTTP TRUTH)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L4)
 * RESPONSABILIDAD: CERTIFICACIÓN DE LOS CÓDIGOS Y SOBRES DE ERROR
 *
 * # Logic:
 * 400 esquema · 413 payload · 400 parámetros de consulta, cada uno
 * con su sobre JSON {error, detail} tipificado.
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
        .unwrap();

        let database_client = TursoClient::connect(
            &format!("file:{database_name}?mode=memory&cache=shared"),
            None,
        )
        .await
        .expect("CRITICAL_FAULT: Failed to anchor in-memory ledger.");

        AppState::assemble(database_client, neutral_artifacts(), config)
            .expect("CRITICAL_FAULT: State assembly collapsed.")
    }

    fn post_ingest(payload: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ingest")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn certify_missing_required_field_is_400_with_envelope() {
        println!("\n🔍 [AUDIT]: Initiating Schema Rejection Certification...");

        let collector_router = create_collector_router(setup_collector_state("contract_schema").await);

        let payload = serde_json::json!({
            "observed_at": "2024-06-01T10:15:00Z",
            "source_address": "203.0.113.42",
            "target_service": "git",
            "action": "file_access"
            // session_id ausente a propósito
        });

        let response = collector_router.oneshot(post_ingest(&payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let envelope = read_json(response).await;
        assert_eq!(envelope["error"], "SchemaError");
        assert!(envelope["detail"].as_str().unwrap().contains("session_id"));
        println!("   ✅ [VERDICT]: Typed rejection envelope certified.");
    }

    #[tokio::test]
    async fn certify_unparseable_timestamp_is_400() {
        let collector_router = create_collector_router(setup_collector_state("contract_time").await);

        let payload = serde_json::json!({
            "observed_at": "last tuesday",
            "source_address": "203.0.113.42",
            "target_service": "git",
            "action": "file_access",
            "session_id": "s1"
        });

        let response = collector_router.oneshot(post_ingest(&payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let envelope = read_json(response).await;
        assert_eq!(envelope["error"], "SchemaError");
    }

    #[tokio::test]
    async fn certify_oversized_payload_is_413_without_ledger_write() {
        let application_state = setup_collector_state("contract_payload").await;
        let collector_router = create_collector_router(application_state.clone());

        let payload = serde_json::json!({
            "observed_at": "2024-06-01T10:15:00Z",
            "source_address": "203.0.113.42",
            "target_service": "git",
            "action": "file_access",
            "session_id": "s1",
            "payload": { "blob": "x".repeat(70 * 1024) }
        });

        let response = collector_router.oneshot(post_ingest(&payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let envelope = read_json(response).await;
        assert_eq!(envelope["error"], "PayloadTooLarge");

        // Sin escritura ni puntuación: el Ledger permanece virgen.
        let rows = application_state
            .event_repository
            .live_events(10, None, None)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn certify_malformed_query_parameters_are_400() {
        let collector_router = create_collector_router(setup_collector_state("contract_params").await);

        let bad_limit = collector_router
            .clone()
            .oneshot(Request::builder().uri("/events?limit=banana").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bad_limit.status(), StatusCode::BAD_REQUEST);
        let envelope = read_json(bad_limit).await;
        assert_eq!(envelope["error"], "QueryParamError");

        let bad_threshold = collector_router
            .clone()
            .oneshot(Request::builder().uri("/alerts?threshold=1.5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bad_threshold.status(), StatusCode::BAD_REQUEST);

        let bad_min_score = collector_router
            .oneshot(Request::builder().uri("/events?min_score=-0.2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(bad_min_score.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn certify_acknowledgment_carries_fingerprint_and_verdict() {
        let collector_router = create_collector_router(setup_collector_state("contract_ack").await);

        let payload = serde_json::json!({
            "observed_at": "2024-06-01T10:15:00Z",
            "source_address": "203.0.113.42",
            "target_service": "git",
            "action": "file_access",
            "session_id": "s1"
        });

        let response = collector_router.oneshot(post_ingest(&payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let acknowledgment = read_json(response).await;
        assert_eq!(acknowledgment["accepted"], true);
        assert_eq!(acknowledgment["inserted"], true);
        assert_eq!(acknowledgment["duplicate"], false);
        assert_eq!(acknowledgment["content_hash"].as_str().unwrap().len(), 64);
        assert!(acknowledgment["score"]["value"].is_f64());
        assert!(acknowledgment["score"]["band"].is_string());
        assert!(acknowledgment["score"]["predicted_class"].is_string());
        assert!(acknowledgment["score"]["traffic_class"].is_string());
    }
}
