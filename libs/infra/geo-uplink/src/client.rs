// INICIO DEL ARCHIVO [libs/infra/geo-uplink/src/client.rs]
/*!
 * =================================================================
 * APARATO: GEOGRAPHIC UPLINK CLIENT (V6.0 - SOBERANO)
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L4)
 * RESPONSABILIDAD: RESOLUCIÓN DE DIRECCIÓN DE ORIGEN EN TIEMPO REAL
 *
 * VISION HIPER-HOLÍSTICA:
 * Implementa el túnel de comunicación hacia el proveedor de
 * geolocalización (esquema ip-api). Permite atribuir país, ciudad e
 * ISP a cada interacción sin base de datos geográfica local.
 * =================================================================
 */

use crate::errors::GeoUplinkError;
use reqwest::Client;
use senuelo_domain_models::{GeoFields, GeoStatus};
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Respuesta técnica del proveedor (esquema ip-api).
#[derive(Debug, Deserialize)]
struct ProviderGeoSchema {
    status: String,
    country: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    isp: Option<String>,
    org: Option<String>,
    timezone: Option<String>,
}

pub struct GeoUplinkClient {
    internal_http_session: Client,
    provider_base_url: String,
}

impl GeoUplinkClient {
    /**
     * Construye una instancia con el timeout de presupuesto caliente.
     * El timeout acota CADA resolución individual; la saturación de
     * concurrencia se gobierna fuera, en el enriquecedor.
     */
    pub fn new(provider_base_url: String, lookup_timeout: Duration) -> Self {
        Self {
            internal_http_session: Client::builder()
                .timeout(lookup_timeout)
                .user_agent("Senuelo-Geo-Enricher/V6.0")
                .build()
                .expect("CRITICAL: Failed to initialize HTTP session"),
            provider_base_url,
        }
    }

    /**
     * Resuelve la verdad geográfica de una dirección enrutable.
     *
     * @param target_address Dirección IPv4/IPv6 o nombre de host.
     */
    pub async fn resolve(&self, target_address: &str) -> Result<GeoFields, GeoUplinkError> {
        let source_url = format!("{}/{}", self.provider_base_url.trim_end_matches('/'), target_address);

        let network_response = self.internal_http_session
            .get(&source_url)
            .send()
            .await?;

        if !network_response.status().is_success() {
            return Err(GeoUplinkError::ProviderRejection);
        }

        let decoded_payload: ProviderGeoSchema = network_response.json().await?;

        if decoded_payload.status != "success" {
            return Err(GeoUplinkError::ProviderRejection);
        }

        Ok(GeoFields {
            country: decoded_payload.country,
            region: decoded_payload.region_name,
            city: decoded_payload.city,
            latitude: decoded_payload.lat,
            longitude: decoded_payload.lon,
            isp: decoded_payload.isp,
            organization: decoded_payload.org,
            timezone: decoded_payload.timezone,
            is_private: false,
            status: GeoStatus::Resolved,
        })
    }
}

/// Detecta rangos no enrutables: RFC1918, loopback, link-local,
/// unique-local IPv6 y direcciones no especificadas. Para ellos el
/// uplink externo nunca se intenta. Una cadena no interpretable como
/// IP se trata como nombre de host y sí se resuelve aguas arriba.
pub fn is_private_address(address: &str) -> bool {
    let Ok(parsed) = address.parse::<IpAddr>() else {
        return false;
    };

    match parsed {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let leading_segment = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 (unique local)
                || (leading_segment & 0xfe00) == 0xfc00
                // fe80::/10 (link local)
                || (leading_segment & 0xffc0) == 0xfe80
        }
    }
}

// FIN DEL ARCHIVO [libs/infra/geo-uplink/src/client.rs]
