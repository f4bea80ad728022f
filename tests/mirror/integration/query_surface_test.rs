// [tests/mirror/integration/query_surface_test.rs]
/**
 * =================================================================
 * APARATO: QUERY SURFACE INTEGRITY TEST (V7.0 - SOBERANO)
 * CLASIFICACIÓN: E2E INTEGRATION / TRINITY EVIDENCE
 * RESPONSABILIDAD: CERTIFICACIÓN DE LA SUPERFICIE DE LECTURA
 *
 * # Logic:
 * 1. Base vacía: listas vacías, ceros y 24 cubos garantizados.
 * 2. Feed de alertas: umbral y orden de severidad descendente.
 * 3. Investigación: 404 tipificado para orígenes desconocidos.
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
    use senuelo_domain_models::{
        canonicalize, content_hash_hex, GeoFields, PredictedClass, RawEvent, RiskBand,
        ScoreVerdict,
    };
    use senuelo_infra_db::TursoClient;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
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

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    async fn get(router: &axum::Router, uri: &str) -> axum::response::Response {
        router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Siembra una fila directamente en el Ledger con un veredicto fijado.
    async fn seed_event(state: &AppState, source: &str, session: &str, value: f64) {
        let instant = Utc.with_ymd_and_hms(2024, 6, 1, 10, 15, 0).unwrap();
        let raw = RawEvent {
            observed_at: Some(instant.to_rfc3339()),
            source_address: Some(source.to_string()),
            target_service: Some("git".to_string()),
            action: Some("file_access".to_string()),
            session_id: Some(session.to_string()),
            ..RawEvent::default()
        };
        let event = canonicalize(raw, instant).unwrap();
        let verdict = ScoreVerdict {
            value,
            band: RiskBand::Medium,
            is_anomaly: false,
            predicted_class: PredictedClass::Benign,
            traffic_class: "NORMAL".to_string(),
            anomaly_component: 0.0,
            scoring_degraded: false,
        };
        let inserted = state
            .event_repository
            .persist_event(&content_hash_hex(&event), &event, &GeoFields::unresolved(), &verdict)
            .await
            .unwrap();
        assert!(inserted);
    }

    #[tokio::test]
    async fn certify_empty_ledger_surface() {
        println!("\n🔍 [AUDIT]: Initiating Empty-Surface Certification...");

        let collector_router = create_collector_router(setup_collector_state("surface_empty").await);

        // Feed vivo y mapa: listas vacías, jamás 5xx.
        for uri in ["/events", "/map", "/alerts"] {
            let response = get(&collector_router, uri).await;
            assert_eq!(response.status(), StatusCode::OK, "uri {}", uri);
            assert_eq!(read_json(response).await.as_array().unwrap().len(), 0);
        }

        // Stats: ceros con la ventana completa de 24 cubos.
        let stats = read_json(get(&collector_router, "/stats").await).await;
        assert_eq!(stats["total_events"], 0);
        assert_eq!(stats["average_score"], 0.0);
        let series = stats["hourly_series"].as_array().unwrap();
        assert_eq!(series.len(), 24);
        for point in series {
            assert_eq!(point["count"], 0);
            assert!(point["bucket"].as_str().unwrap().ends_with(":00:00Z"));
        }

        // Analytics e inteligencia: misma disciplina de ventana.
        let analytics = read_json(get(&collector_router, "/analytics").await).await;
        assert_eq!(analytics["total_24h"], 0);
        assert_eq!(analytics["time_series"].as_array().unwrap().len(), 24);

        let insights = read_json(get(&collector_router, "/ml-insights").await).await;
        assert_eq!(insights["anomaly_count"], 0);
        assert_eq!(insights["hourly_series"].as_array().unwrap().len(), 24);
        assert_eq!(insights["suspicious_traffic_count"], 0);
        println!("   ✅ [VERDICT]: Empty surface degrades to zeroes, never 5xx.");
    }

    #[tokio::test]
    async fn certify_alert_feed_over_http() {
        let application_state = setup_collector_state("surface_alerts").await;
        let collector_router = create_collector_router(application_state.clone());

        seed_event(&application_state, "203.0.113.1", "s-low", 0.30).await;
        seed_event(&application_state, "203.0.113.2", "s-mid", 0.55).await;
        seed_event(&application_state, "203.0.113.3", "s-high", 0.92).await;

        let alerts = read_json(get(&collector_router, "/alerts?threshold=0.5").await).await;
        let rows = alerts.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!((rows[0]["score"]["value"].as_f64().unwrap() - 0.92).abs() < 1e-9);
        assert!((rows[1]["score"]["value"].as_f64().unwrap() - 0.55).abs() < 1e-9);

        // Límite explícito respetado.
        let limited = read_json(get(&collector_router, "/alerts?threshold=0.5&limit=1").await).await;
        assert_eq!(limited.as_array().unwrap().len(), 1);

        // El umbral por defecto (0.5) produce el mismo corte.
        let default_threshold = read_json(get(&collector_router, "/alerts").await).await;
        assert_eq!(default_threshold.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn certify_min_score_boundary_over_http() {
        let application_state = setup_collector_state("surface_minscore").await;
        let collector_router = create_collector_router(application_state.clone());

        seed_event(&application_state, "203.0.113.9", "s-perfect", 1.0).await;
        seed_event(&application_state, "203.0.113.9", "s-near", 0.9999).await;

        let rows = read_json(get(&collector_router, "/events?min_score=1.0").await).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 1, "min_score=1.0 must admit only exact 1.0");
        assert!((rows[0]["score"]["value"].as_f64().unwrap() - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn certify_investigation_of_unknown_source_is_404() {
        let collector_router = create_collector_router(setup_collector_state("surface_404").await);

        let response = get(&collector_router, "/investigate/198.18.0.1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let envelope = read_json(response).await;
        assert_eq!(envelope["error"], "NotFound");
        assert!(envelope["detail"].as_str().unwrap().contains("198.18.0.1"));
    }

    #[tokio::test]
    async fn certify_investigation_dossier_over_http() {
        let application_state = setup_collector_state("surface_dossier").await;
        let collector_router = create_collector_router(application_state.clone());

        seed_event(&application_state, "203.0.113.50", "s-1", 0.40).await;
        seed_event(&application_state, "203.0.113.50", "s-2", 0.80).await;

        let dossier = read_json(get(&collector_router, "/investigate/203.0.113.50").await).await;
        assert_eq!(dossier["source_address"], "203.0.113.50");
        assert_eq!(dossier["total_events"], 2);
        assert!((dossier["max_score"].as_f64().unwrap() - 0.80).abs() < 1e-9);
        assert_eq!(dossier["hourly_series"].as_array().unwrap().len(), 24);
        assert_eq!(dossier["events"].as_array().unwrap().len(), 2);
    }
}
