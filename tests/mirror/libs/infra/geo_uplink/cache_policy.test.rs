// [tests/mirror/libs/infra/geo_uplink/cache_policy.test.rs]
/**
 * =================================================================
 * APARATO: CACHE POLICY CERTIFIER (V4.0 - DUAL TTL PROOF)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L4)
 * RESPONSABILIDAD: CERTIFICACIÓN DEL TTL BIFÁSICO Y CUPO ACOTADO
 * =================================================================
 */

#[cfg(test)]
mod tests {
    use senuelo_domain_models::{GeoFields, GeoStatus};
    use senuelo_infra_geo::GeoCache;
    use chrono::{Duration, TimeZone, Utc};

    fn resolved(country: &str) -> GeoFields {
        GeoFields {
            country: Some(country.to_string()),
            status: GeoStatus::Resolved,
            ..GeoFields::unresolved()
        }
    }

    fn cache(capacity: usize) -> GeoCache {
        GeoCache::new(
            capacity,
            std::time::Duration::from_secs(24 * 3600),
            std::time::Duration::from_secs(300),
        )
    }

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn certify_negative_entries_decay_in_five_minutes() {
        println!("\n🔍 [AUDIT]: Initiating Dual-TTL Certification...");

        let cache = cache(128);
        cache.store("203.0.113.1", GeoFields::unresolved(), t0());
        cache.store("203.0.113.2", resolved("Spain"), t0());

        // A los 4 minutos ambos viven.
        let at_four = t0() + Duration::minutes(4);
        assert!(cache.lookup("203.0.113.1", at_four).is_some());
        assert!(cache.lookup("203.0.113.2", at_four).is_some());

        // A los 6 minutos el negativo decae; el positivo persiste.
        let at_six = t0() + Duration::minutes(6);
        assert!(cache.lookup("203.0.113.1", at_six).is_none());
        assert!(cache.lookup("203.0.113.2", at_six).is_some());

        // A las 25 horas también decae el positivo.
        let next_day = t0() + Duration::hours(25);
        assert!(cache.lookup("203.0.113.2", next_day).is_none());
        println!("   ✅ [VERDICT]: 5 min negative / 24 h positive decay certified.");
    }

    #[test]
    fn certify_capacity_is_a_hard_bound() {
        let cache = cache(3);

        for index in 0..10 {
            cache.store(
                &format!("198.51.100.{index}"),
                resolved("FR"),
                t0() + Duration::seconds(index),
            );
        }

        assert!(cache.len() <= 3, "bound violated: {} entries", cache.len());
        // Los más recientes sobreviven a la expulsión por ranciedad.
        assert!(cache
            .lookup("198.51.100.9", t0() + Duration::seconds(11))
            .is_some());
    }

    #[test]
    fn certify_sweep_reclaims_expired_entries() {
        let cache = cache(128);
        for index in 0..8 {
            cache.store(&format!("203.0.113.{index}"), GeoFields::unresolved(), t0());
        }
        assert_eq!(cache.len(), 8);

        cache.sweep(t0() + Duration::minutes(10));
        assert_eq!(cache.len(), 0, "negative entries must be reclaimed by the sweep");
    }

    #[test]
    fn certify_refreshed_entry_renews_its_ttl() {
        let cache = cache(128);
        cache.store("203.0.113.5", GeoFields::unresolved(), t0());

        // Refresco a los 4 minutos: el reloj del TTL reinicia.
        cache.store("203.0.113.5", GeoFields::unresolved(), t0() + Duration::minutes(4));

        let at_seven = t0() + Duration::minutes(7);
        assert!(cache.lookup("203.0.113.5", at_seven).is_some());
    }
}
