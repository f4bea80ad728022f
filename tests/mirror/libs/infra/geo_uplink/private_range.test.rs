// [tests/mirror/libs/infra/geo_uplink/private_range.test.rs]
/**
 * =================================================================
 * APARATO: PRIVATE RANGE CERTIFIER (V4.0 - SHORT-CIRCUIT PROOF)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L4)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL CORTOCIRCUITO SIN LLAMADA EXTERNA
 *
 * # Logic:
 * El proveedor apunta a un puerto muerto: cualquier intento de
 * consulta externa degradaría a 'unresolved'. Que una dirección
 * privada responda 'private' con país nulo PRUEBA que el uplink
 * jamás se intentó.
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use senuelo_domain_models::GeoStatus;
    use senuelo_infra_geo::{GeoEnricher, GeoEnricherConfig};
    use std::time::Duration;

    fn enricher_with_dead_provider() -> GeoEnricher {
        GeoEnricher::new(GeoEnricherConfig {
            // Puerto 'discard': la conexión colapsa de inmediato.
            provider_base_url: "http://127.0.0.1:9/json".to_string(),
            lookup_timeout: Duration::from_millis(250),
            concurrency: 4,
            acquire_budget: Duration::from_millis(100),
            cache_capacity: 64,
            positive_ttl: Duration::from_secs(3600),
            negative_ttl: Duration::from_secs(60),
        })
    }

    #[tokio::test]
    async fn certify_private_ranges_never_reach_the_uplink() {
        println!("\n🔍 [AUDIT]: Initiating Private Short-Circuit Certification...");

        let enricher = enricher_with_dead_provider();

        for private_address in ["10.1.2.3", "192.168.1.50", "172.16.0.9", "127.0.0.1", "::1", "fd00::1"] {
            let fields = enricher.enrich(private_address).await;

            assert!(fields.is_private, "'{private_address}' must short-circuit");
            assert_eq!(fields.status, GeoStatus::Private);
            assert_eq!(fields.country, None);
            assert_eq!(fields.latitude, None);
        }

        // El cortocircuito tampoco ocupa la caché.
        let (entries, _capacity) = enricher.cache_metrics();
        assert_eq!(entries, 0, "private hits must not populate the cache");
        println!("   ✅ [VERDICT]: Zero outbound attempts for non-routable ranges.");
    }

    #[tokio::test]
    async fn certify_uplink_failures_are_absorbed_not_raised() {
        let enricher = enricher_with_dead_provider();

        // Dirección enrutable con proveedor muerto: degradación silenciosa.
        let fields = enricher.enrich("203.0.113.42").await;

        assert_eq!(fields.status, GeoStatus::Unresolved);
        assert!(!fields.is_private);
        assert_eq!(fields.country, None);

        // El fallo queda anclado con TTL negativo.
        let (entries, _capacity) = enricher.cache_metrics();
        assert_eq!(entries, 1);
    }
}
