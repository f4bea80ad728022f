// [libs/infra/db-turso/src/repositories/event/queries.rs]
/*!
 * =================================================================
 * APARATO: EVENT LEDGER SQL STORE (V9.0 - APPEND-ONLY LEDGER SQL)
 * CLASIFICACIÓN: INFRASTRUCTURE SQL (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN DE SENTENCIAS ATÓMICAS DEL LEDGER
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. FIRST-WRITER-WINS: La inserción usa ON CONFLICT(content_hash)
 *    DO NOTHING; el conteo de filas afectadas distingue inserción
 *    fresca de deduplicación sin segunda consulta.
 * 2. WINDOW DISCIPLINE: Toda consulta ventaneada filtra por
 *    'ingested_at >= ?' con marcas en el formato de almacenamiento,
 *    de comparación lexicográfica estable.
 * 3. DETERMINISTIC ORDER: Los top-N ordenan por volumen descendente
 *    con desempate lexicográfico por clave.
 * =================================================================
 */

// --- ESTRATO DE INGESTA ---

/// Inserta la fila canónica completa. El conflicto de huella preserva
/// la fila original intacta (sin UPDATE).
pub const INSERT_EVENT: &str = r#"
    INSERT INTO events (
        content_hash, observed_at, ingested_at, source_address,
        protocol, target_service, action, target_path, session_id,
        user_agent, headers_json, payload_json,
        geo_country, geo_region, geo_city, geo_latitude, geo_longitude,
        geo_isp, geo_organization, geo_timezone, geo_is_private, geo_status,
        score_value, score_band, score_is_anomaly, score_predicted_class,
        score_traffic_class, score_anomaly_component, scoring_degraded
    ) VALUES (
        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
        ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22,
        ?23, ?24, ?25, ?26, ?27, ?28, ?29
    )
    ON CONFLICT(content_hash) DO NOTHING
"#;

// --- ESTRATO DE LECTURA EN VIVO ---

/// Eventos más recientes, con filtro opcional por origen (centinela
/// de cadena vacía) y puntuación mínima.
pub const FETCH_LIVE_EVENTS: &str = r#"
    SELECT
        content_hash, observed_at, ingested_at, source_address,
        protocol, target_service, action, target_path, session_id,
        user_agent, headers_json, payload_json,
        geo_country, geo_region, geo_city, geo_latitude, geo_longitude,
        geo_isp, geo_organization, geo_timezone, geo_is_private, geo_status,
        score_value, score_band, score_is_anomaly, score_predicted_class,
        score_traffic_class, score_anomaly_component, scoring_degraded
    FROM events
    WHERE (?1 = '' OR source_address = ?1) AND score_value >= ?2
    ORDER BY ingested_at DESC
    LIMIT ?3
"#;

/// Alertas por encima del umbral, las más severas primero.
pub const FETCH_ALERTS: &str = r#"
    SELECT
        content_hash, observed_at, ingested_at, source_address,
        protocol, target_service, action, target_path, session_id,
        user_agent, headers_json, payload_json,
        geo_country, geo_region, geo_city, geo_latitude, geo_longitude,
        geo_isp, geo_organization, geo_timezone, geo_is_private, geo_status,
        score_value, score_band, score_is_anomaly, score_predicted_class,
        score_traffic_class, score_anomaly_component, scoring_degraded
    FROM events
    WHERE score_value >= ?1
    ORDER BY score_value DESC, ingested_at DESC
    LIMIT ?2
"#;

/// Expediente completo de una dirección de origen.
pub const FETCH_SOURCE_DOSSIER: &str = r#"
    SELECT
        content_hash, observed_at, ingested_at, source_address,
        protocol, target_service, action, target_path, session_id,
        user_agent, headers_json, payload_json,
        geo_country, geo_region, geo_city, geo_latitude, geo_longitude,
        geo_isp, geo_organization, geo_timezone, geo_is_private, geo_status,
        score_value, score_band, score_is_anomaly, score_predicted_class,
        score_traffic_class, score_anomaly_component, scoring_degraded
    FROM events
    WHERE source_address = ?1
    ORDER BY ingested_at DESC
    LIMIT ?2
"#;

// --- ESTRATO DE AGREGACIÓN GLOBAL ---

/// Totales de vida completa del Ledger.
pub const AGGREGATE_GLOBAL_TOTALS: &str = r#"
    SELECT
        COUNT(*),
        COUNT(DISTINCT source_address),
        COALESCE(AVG(score_value), 0.0),
        COALESCE(SUM(CASE WHEN score_band = 'HIGH' THEN 1 ELSE 0 END), 0),
        COALESCE(SUM(score_is_anomaly), 0)
    FROM events
"#;

/// Totales restringidos a la ventana de 24 horas.
pub const AGGREGATE_WINDOWED_TOTALS: &str = r#"
    SELECT
        COUNT(*),
        COALESCE(SUM(CASE WHEN score_band = 'HIGH' THEN 1 ELSE 0 END), 0),
        COUNT(DISTINCT source_address),
        COALESCE(AVG(score_value), 0.0)
    FROM events
    WHERE ingested_at >= ?1
"#;

/// Volumen de eventos dentro de la ventana.
pub const COUNT_WINDOWED_EVENTS: &str = r#"
    SELECT COUNT(*) FROM events WHERE ingested_at >= ?1
"#;

// --- ESTRATO TOP-N (VIDA COMPLETA) ---

pub const TOP_SERVICES: &str = r#"
    SELECT target_service, COUNT(*) AS volume
    FROM events
    GROUP BY target_service
    ORDER BY volume DESC, target_service ASC
    LIMIT ?1
"#;

pub const TOP_ACTIONS: &str = r#"
    SELECT action, COUNT(*) AS volume
    FROM events
    GROUP BY action
    ORDER BY volume DESC, action ASC
    LIMIT ?1
"#;

pub const TOP_COUNTRIES: &str = r#"
    SELECT geo_country, COUNT(*) AS volume
    FROM events
    WHERE geo_country IS NOT NULL
    GROUP BY geo_country
    ORDER BY volume DESC, geo_country ASC
    LIMIT ?1
"#;

// --- ESTRATO TOP-N (VENTANA 24H) ---

pub const TOP_COUNTRIES_WINDOWED: &str = r#"
    SELECT geo_country, COUNT(*) AS volume
    FROM events
    WHERE geo_country IS NOT NULL AND ingested_at >= ?1
    GROUP BY geo_country
    ORDER BY volume DESC, geo_country ASC
    LIMIT ?2
"#;

pub const TOP_SOURCES_WINDOWED: &str = r#"
    SELECT source_address, COUNT(*) AS volume
    FROM events
    WHERE ingested_at >= ?1
    GROUP BY source_address
    ORDER BY volume DESC, source_address ASC
    LIMIT ?2
"#;

pub const TOP_PROTOCOLS_WINDOWED: &str = r#"
    SELECT protocol, COUNT(*) AS volume
    FROM events
    WHERE protocol IS NOT NULL AND ingested_at >= ?1
    GROUP BY protocol
    ORDER BY volume DESC, protocol ASC
    LIMIT ?2
"#;

// --- ESTRATO DE HISTOGRAMAS Y SERIES ---

pub const BAND_HISTOGRAM: &str = r#"
    SELECT score_band, COUNT(*) FROM events GROUP BY score_band
"#;

/// Serie horaria (cubo, puntuación media, volumen) dentro de la ventana.
/// Los cubos ausentes se completan a cero en el estrato Rust.
pub const HOURLY_SCORE_SERIES: &str = r#"
    SELECT
        strftime('%Y-%m-%dT%H:00:00Z', ingested_at) AS bucket,
        COALESCE(AVG(score_value), 0.0),
        COUNT(*)
    FROM events
    WHERE ingested_at >= ?1
    GROUP BY bucket
    ORDER BY bucket ASC
"#;

// --- ESTRATO DEL MAPA DE AMENAZAS ---

/// Agregación por origen restringida a filas geolocalizadas.
pub const MAP_POINTS: &str = r#"
    SELECT
        source_address,
        COUNT(*) AS volume,
        COALESCE(AVG(score_value), 0.0),
        MAX(geo_country),
        MAX(geo_city),
        MAX(geo_latitude),
        MAX(geo_longitude)
    FROM events
    WHERE geo_latitude IS NOT NULL AND geo_longitude IS NOT NULL
    GROUP BY source_address
    ORDER BY volume DESC, source_address ASC
"#;

// --- ESTRATO DE INTELIGENCIA DEL ENSAMBLE ---

pub const ANOMALY_TOTALS: &str = r#"
    SELECT
        COALESCE(AVG(score_anomaly_component), 0.0),
        COALESCE(SUM(score_is_anomaly), 0)
    FROM events
"#;

/// Orígenes cuya puntuación media supera el umbral de alto riesgo.
pub const TOP_RISK_SOURCES: &str = r#"
    SELECT source_address, AVG(score_value) AS mean_score, COUNT(*)
    FROM events
    GROUP BY source_address
    HAVING mean_score >= ?1
    ORDER BY mean_score DESC, source_address ASC
    LIMIT ?2
"#;

pub const TRAFFIC_CLASS_HISTOGRAM: &str = r#"
    SELECT score_traffic_class, COUNT(*) AS volume
    FROM events
    GROUP BY score_traffic_class
    ORDER BY volume DESC, score_traffic_class ASC
"#;

pub const SUSPICIOUS_TRAFFIC_COUNT: &str = r#"
    SELECT COUNT(*) FROM events WHERE score_traffic_class IN ('TOR', 'VPN')
"#;
