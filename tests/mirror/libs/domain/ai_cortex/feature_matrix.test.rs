// [tests/mirror/libs/domain/ai_cortex/feature_matrix.test.rs]
/**
 * =================================================================
 * APARATO: FEATURE MATRIX CERTIFIER (V5.0 - PROJECTION PARITY)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L9)
 * RESPONSABILIDAD: CERTIFICACIÓN DE LA PROYECCIÓN EVENTO -> VECTOR
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use senuelo_domain_ai_cortex::{featurize, FeatureFrame, IndicatorPolicy, Preprocessing, ScalerParams};
    use senuelo_domain_models::{canonicalize, GeoFields, GeoStatus, RawEvent};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn rich_event() -> senuelo_domain_models::Event {
        let mut headers = BTreeMap::new();
        headers.insert("x-forwarded-for".to_string(), "203.0.113.9".to_string());
        headers.insert("accept".to_string(), "*/*".to_string());

        let raw = RawEvent {
            observed_at: Some("2024-06-01T22:45:00Z".to_string()),
            source_address: Some("203.0.113.42".to_string()),
            target_service: Some("ci".to_string()),
            action: Some("ci_job_run".to_string()),
            session_id: Some("session-alpha".to_string()),
            protocol: Some("HTTP".to_string()),
            target_path: Some("pipelines/deploy/.kubeconfig-prod".to_string()),
            user_agent: Some("curl/8.4.0".to_string()),
            headers: Some(headers),
            payload: Some(serde_json::json!({ "job": "deploy", "retries": 3 })),
        };
        canonicalize(raw, Utc.with_ymd_and_hms(2024, 6, 1, 22, 45, 5).unwrap()).unwrap()
    }

    fn resolved_geo() -> GeoFields {
        GeoFields {
            country: Some("Netherlands".to_string()),
            latitude: Some(52.37),
            longitude: Some(4.89),
            status: GeoStatus::Resolved,
            ..GeoFields::unresolved()
        }
    }

    fn preprocessing(columns: &[&str], encoders: BTreeMap<String, BTreeMap<String, f64>>) -> Preprocessing {
        Preprocessing {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            scaler: ScalerParams {
                mean: vec![0.0; columns.len()],
                scale: vec![1.0; columns.len()],
            },
            encoders,
            unknown_code: -7.0,
        }
    }

    #[test]
    fn certify_temporal_and_lexical_extraction() {
        let frame = FeatureFrame::extract(&rich_event(), &resolved_geo(), &IndicatorPolicy::default());

        assert_eq!(frame.numeric("hour_of_day"), Some(22.0));
        // 2024-06-01 es sábado: índice 5 desde lunes.
        assert_eq!(frame.numeric("day_of_week"), Some(5.0));
        assert_eq!(frame.numeric("path_depth"), Some(2.0));
        assert_eq!(frame.numeric("path_is_hidden"), Some(1.0));
        assert_eq!(frame.numeric("header_count"), Some(2.0));
        assert_eq!(frame.numeric("geo_resolved"), Some(1.0));
        assert_eq!(frame.numeric("source_is_private"), Some(0.0));
        // 'kubeconfig' es marcador de la política por defecto.
        assert_eq!(frame.numeric("indicator_path"), Some(1.0));
        assert!(frame.numeric("payload_bytes").unwrap_or(0.0) > 0.0);
    }

    #[test]
    fn certify_two_artifacts_project_independent_orders() {
        let frame = FeatureFrame::extract(&rich_event(), &resolved_geo(), &IndicatorPolicy::default());

        let alpha = preprocessing(&["hour_of_day", "header_count"], BTreeMap::new());
        let beta = preprocessing(&["header_count", "hour_of_day"], BTreeMap::new());

        assert_eq!(featurize(&frame, &alpha), vec![22.0, 2.0]);
        assert_eq!(featurize(&frame, &beta), vec![2.0, 22.0]);
    }

    #[test]
    fn certify_categorical_encoding_with_reserved_unknown() {
        let frame = FeatureFrame::extract(&rich_event(), &resolved_geo(), &IndicatorPolicy::default());

        let mut action_codes = BTreeMap::new();
        action_codes.insert("git_push".to_string(), 7.0);
        // 'ci_job_run' ausente a propósito.
        let mut encoders = BTreeMap::new();
        encoders.insert("action".to_string(), action_codes);

        let mut country_codes = BTreeMap::new();
        country_codes.insert("Netherlands".to_string(), 31.0);
        encoders.insert("geo_country".to_string(), country_codes);

        let projection = preprocessing(&["action", "geo_country"], encoders);
        assert_eq!(featurize(&frame, &projection), vec![-7.0, 31.0]);
    }

    #[test]
    fn certify_extraction_is_deterministic() {
        let event = rich_event();
        let geo = resolved_geo();
        let policy = IndicatorPolicy::default();

        let alpha = FeatureFrame::extract(&event, &geo, &policy);
        let beta = FeatureFrame::extract(&event, &geo, &policy);

        let projection = preprocessing(
            &["hour_of_day", "payload_bytes", "indicator_path", "session_id_length"],
            BTreeMap::new(),
        );
        assert_eq!(featurize(&alpha, &projection), featurize(&beta, &projection));
    }
}
