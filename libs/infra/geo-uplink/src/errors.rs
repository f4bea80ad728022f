// [libs/infra/geo-uplink/src/errors.rs]

use thiserror::Error;

/// Catálogo de fallos en el enlace con el proveedor geográfico.
/// Ninguno de estos fallos escapa del enriquecedor: todos se absorben
/// como resultado no resuelto y el evento persiste igualmente.
#[derive(Error, Debug)]
pub enum GeoUplinkError {
    #[error("[L4_GEO_FAULT]: NETWORK_UNREACHABLE -> {0}")]
    ConnectionFault(#[from] reqwest::Error),

    #[error("[L4_GEO_FAULT]: PROVIDER_REJECTION -> lookup refused for the address")]
    ProviderRejection,
}
