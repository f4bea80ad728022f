// [libs/domain/models-rs/src/geo.rs]
/*!
 * =================================================================
 * APARATO: GEO ENRICHMENT CONTRACT (V4.0)
 * CLASIFICACIÓN: DOMAIN MODELS (ESTRATO L2)
 * RESPONSABILIDAD: DEFINICIÓN DEL RESULTADO DE RESOLUCIÓN GEOGRÁFICA
 * =================================================================
 */

use serde::{Deserialize, Serialize};

/// Estado terminal de una resolución geográfica.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeoStatus {
    /// El proveedor externo devolvió coordenadas válidas.
    Resolved,
    /// El proveedor falló o no respondió dentro del presupuesto.
    Unresolved,
    /// Dirección en rango no enrutable; la consulta externa nunca se intentó.
    Private,
}

impl GeoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoStatus::Resolved => "resolved",
            GeoStatus::Unresolved => "unresolved",
            GeoStatus::Private => "private",
        }
    }
}

/// Campos de enriquecimiento geográfico adjuntos a un evento.
/// Todos los campos de localización son opcionales: un evento persiste
/// íntegro aunque el uplink externo esté caído.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoFields {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub isp: Option<String>,
    pub organization: Option<String>,
    pub timezone: Option<String>,
    pub is_private: bool,
    pub status: GeoStatus,
}

impl GeoFields {
    /// Resultado vacío para fallos de uplink absorbidos (TTL negativo).
    pub fn unresolved() -> Self {
        Self {
            country: None,
            region: None,
            city: None,
            latitude: None,
            longitude: None,
            isp: None,
            organization: None,
            timezone: None,
            is_private: false,
            status: GeoStatus::Unresolved,
        }
    }

    /// Cortocircuito para rangos RFC1918 / loopback / link-local / ULA.
    pub fn private_range() -> Self {
        Self {
            is_private: true,
            status: GeoStatus::Private,
            ..Self::unresolved()
        }
    }

    /// Indica si la fila aporta coordenadas renderizables en el mapa.
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

impl Default for GeoFields {
    fn default() -> Self {
        Self::unresolved()
    }
}
