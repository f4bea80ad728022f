// [libs/domain/models-rs/src/tests_canonical.rs]
/**
 * =================================================================
 * APARATO: CANONICAL MODEL CERTIFICATION (V7.0 - INTEGRATION LEVEL)
 * CLASIFICACIÓN: TRINITY EVIDENCE (ESTRATO L2-MODELS)
 * RESPONSABILIDAD: CERTIFICACIÓN DE CANONICALIZACIÓN Y HUELLA SHA-256
 *
 * # Logic:
 * Valida la cadena Registro Crudo -> Entidad Canónica -> Huella:
 * 1. Idempotencia de la canonicalización.
 * 2. Determinismo y sensibilidad de la huella de contenido.
 * 3. Separación centinela entre campos ausentes y vacíos adyacentes.
 * =================================================================
 */
