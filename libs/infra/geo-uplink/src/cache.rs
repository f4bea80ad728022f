// [libs/infra/geo-uplink/src/cache.rs]
/*!
 * =================================================================
 * APARATO: GEO CACHE STRATA (V5.0 - DUAL TTL)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: CACHÉ CONCURRENTE ACOTADA CON TTL BIFÁSICO
 *
 * # Política:
 * - Entradas positivas (resolved/private): TTL largo (24 h).
 * - Entradas negativas (unresolved): TTL corto (5 min) para que un
 *   proveedor caído se reintente pronto sin martillearlo.
 * - Capacidad acotada: al insertar sobre cupo se expulsa la entrada
 *   más rancia; el daemon de vigilancia barre expirados y excedentes.
 * =================================================================
 */

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use senuelo_domain_models::{GeoFields, GeoStatus};
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheSlot {
    fields: GeoFields,
    fetched_at: DateTime<Utc>,
}

pub struct GeoCache {
    slots: DashMap<String, CacheSlot>,
    capacity: usize,
    positive_ttl: Duration,
    negative_ttl: Duration,
}

impl GeoCache {
    pub fn new(
        capacity: usize,
        positive_ttl: std::time::Duration,
        negative_ttl: std::time::Duration,
    ) -> Self {
        Self {
            slots: DashMap::with_capacity(capacity.min(65_536)),
            capacity,
            positive_ttl: Duration::from_std(positive_ttl).unwrap_or(Duration::hours(24)),
            negative_ttl: Duration::from_std(negative_ttl).unwrap_or(Duration::minutes(5)),
        }
    }

    /// Recupera una entrada vigente según el TTL de su estado.
    pub fn lookup(&self, address: &str, now: DateTime<Utc>) -> Option<GeoFields> {
        let slot = self.slots.get(address)?;
        if self.is_expired_slot(&slot, now) {
            drop(slot);
            self.slots.remove(address);
            return None;
        }
        Some(slot.fields.clone())
    }

    /// Ancla una resolución (positiva o negativa) expulsando la entrada
    /// más rancia si el cupo está agotado.
    pub fn store(&self, address: &str, fields: GeoFields, now: DateTime<Utc>) {
        if self.slots.len() >= self.capacity && !self.slots.contains_key(address) {
            self.evict_stalest();
        }
        self.slots.insert(
            address.to_string(),
            CacheSlot { fields, fetched_at: now },
        );
    }

    /// Barrido periódico: primero expirados, luego excedentes de cupo
    /// en orden de ranciedad.
    pub fn sweep(&self, now: DateTime<Utc>) {
        let before = self.slots.len();
        self.slots.retain(|_, slot| !self.is_expired_slot(slot, now));

        while self.slots.len() > self.capacity {
            if !self.evict_stalest() {
                break;
            }
        }

        let after = self.slots.len();
        if before != after {
            debug!(evicted = before - after, remaining = after, "geo_cache_sweep");
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn is_expired_slot(&self, slot: &CacheSlot, now: DateTime<Utc>) -> bool {
        let ttl = match slot.fields.status {
            GeoStatus::Unresolved => self.negative_ttl,
            GeoStatus::Resolved | GeoStatus::Private => self.positive_ttl,
        };
        now - slot.fetched_at >= ttl
    }

    fn evict_stalest(&self) -> bool {
        let stalest = self
            .slots
            .iter()
            .min_by_key(|entry| entry.value().fetched_at)
            .map(|entry| entry.key().clone());

        match stalest {
            Some(address) => self.slots.remove(&address).is_some(),
            None => false,
        }
    }
}
