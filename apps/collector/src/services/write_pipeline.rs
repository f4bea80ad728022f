// [apps/collector/src/services/write_pipeline.rs]
/*!
 * =================================================================
 * APARATO: WRITE PIPELINE DAEMON (V7.0 - SINGLE WRITER)
 * CLASIFICACIÓN: BACKGROUND INFRASTRUCTURE SERVICE (ESTRATO L4)
 * RESPONSABILIDAD: ESCRITOR LÓGICO ÚNICO DEL LEDGER CON BACKPRESSURE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE LOGICAL WRITER: Un único daemon drena la cola acotada y
 *    comete cada fila antes de responder el ack, preservando la
 *    durabilidad del contrato de ingesta.
 * 2. HONEST BACKPRESSURE: Cola llena = 503 con Retry-After; jamás se
 *    finge una escritura aceptada.
 * 3. ACK ORIENTED: Cada comando transporta su canal oneshot; el
 *    handler espera la confirmación de commit (o el fallo tipificado).
 * =================================================================
 */

use senuelo_domain_models::{Event, GeoFields, ScoreVerdict};
use senuelo_infra_db::{DbError, EventRepository};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

/// Comando de persistencia con su canal de confirmación.
pub struct WriteCommand {
    pub content_hash: String,
    pub event: Event,
    pub geo: GeoFields,
    pub score: ScoreVerdict,
    pub ack: oneshot::Sender<Result<bool, DbError>>,
}

pub type WriteQueueSender = mpsc::Sender<WriteCommand>;

/**
 * Lanza el daemon escritor sobre el reactor de Tokio y devuelve el
 * extremo emisor de la cola acotada.
 *
 * La capacidad de la cola ES la marca de agua de backpressure: cuando
 * try_send falla con Full, la superficie de ingesta responde 503.
 */
pub fn spawn_write_pipeline(
    event_repository: Arc<EventRepository>,
    queue_capacity: usize,
) -> WriteQueueSender {
    let (command_sender, mut command_receiver) =
        mpsc::channel::<WriteCommand>(queue_capacity.max(1));

    tokio::spawn(async move {
        info!(
            "💾 [WRITE_PIPELINE]: Single-writer daemon operational (high watermark {}).",
            queue_capacity
        );

        while let Some(command) = command_receiver.recv().await {
            let persistence_result = event_repository
                .persist_event(
                    &command.content_hash,
                    &command.event,
                    &command.geo,
                    &command.score,
                )
                .await;

            if let Err(fault) = &persistence_result {
                error!("❌ [WRITE_PIPELINE]: Commit failed: {}", fault);
            }

            // El receptor pudo abandonar por deadline de petición; la
            // fila ya cometida se conserva (el reintento deduplica).
            let _ = command.ack.send(persistence_result);
        }

        info!("💾 [WRITE_PIPELINE]: Queue drained, writer daemon retiring.");
    });

    command_sender
}
