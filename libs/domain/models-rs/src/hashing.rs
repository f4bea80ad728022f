// [libs/domain/models-rs/src/hashing.rs]
/*!
 * =================================================================
 * APARATO: CONTENT FINGERPRINT ENGINE (V5.0 - COLLISION SHIELD)
 * CLASIFICACIÓN: DOMAIN CORE (ESTRATO L2)
 * RESPONSABILIDAD: HUELLA SHA-256 DETERMINISTA PARA DEDUPLICACIÓN
 *
 * # Física de la Huella:
 * La huella cubre la tupla canónica (observed_at, source_address,
 * target_service, action, target_path, session_id, payload) en orden
 * fijo. Cada campo presente se marca con 0x01 y prefijo de longitud
 * u32 big-endian; cada campo ausente aporta el byte centinela 0x00.
 * El prefijo de longitud elimina colisiones por concatenación.
 * =================================================================
 */

use crate::event::Event;
use sha2::{Digest, Sha256};

const FIELD_PRESENT: u8 = 0x01;
const FIELD_ABSENT: u8 = 0x00;

/// Calcula la huella de contenido de 32 bytes de un evento canónico.
/// El reintento de un productor produce la misma huella y colapsa en
/// una única fila del Ledger.
pub fn content_hash(event: &Event) -> [u8; 32] {
    let mut hasher = Sha256::new();

    feed(&mut hasher, Some(&Event::hashing_timestamp(&event.observed_at)));
    feed(&mut hasher, Some(&event.source_address));
    feed(&mut hasher, Some(&event.target_service));
    feed(&mut hasher, Some(&event.action));
    feed(&mut hasher, event.target_path.as_deref());
    feed(&mut hasher, Some(&event.session_id));
    feed(&mut hasher, event.payload_json.as_deref());

    hasher.finalize().into()
}

/// Huella renderizada en hexadecimal (64 caracteres), clave del Ledger.
pub fn content_hash_hex(event: &Event) -> String {
    hex::encode(content_hash(event))
}

fn feed(hasher: &mut Sha256, field: Option<&str>) {
    match field {
        Some(value) => {
            hasher.update([FIELD_PRESENT]);
            hasher.update((value.len() as u32).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        None => hasher.update([FIELD_ABSENT]),
    }
}
