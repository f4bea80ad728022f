// INICIO DEL ARCHIVO [apps/collector/src/kernel.rs]
/**
 * =================================================================
 * APARATO: COLLECTOR SOVEREIGN KERNEL (V10.0 - FAIL FAST)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA E IGNICIÓN SEGURA
 *
 * VISION HIPER-HOLÍSTICA:
 * Actúa como la placa base donde se conectan todos los servicios:
 * 1. Carga del trío de artefactos ANTES de abrir el socket TCP
 *    (código de salida 2 si alguno colapsa).
 * 2. Enlace y bootstrap del Ledger (código de salida 3).
 * 3. Ensamblado del estado, daemons de fondo y servidor Axum con
 *    apagado coordinado.
 * =================================================================
 */

use crate::config::CollectorConfig;
use crate::routes::create_collector_router;
use crate::services::spawn_cache_warden;
use crate::state::AppState;
use anyhow::Context;
use senuelo_domain_ai_cortex::{ArtifactSet, CortexError};
use senuelo_infra_db::{DbError, TursoClient};
use thiserror::Error;
use tracing::{info, instrument};

/// Fallos de ignición con su código de salida del proceso.
#[derive(Error, Debug)]
pub enum IgnitionFault {
    #[error("[L1_IGNITION_FAULT]: MODEL_LOAD_COLLAPSE -> {0}")]
    ModelLoad(#[from] CortexError),

    #[error("[L1_IGNITION_FAULT]: STORE_INIT_COLLAPSE -> {0}")]
    StoreInit(#[from] DbError),
}

impl IgnitionFault {
    pub fn exit_code(&self) -> i32 {
        match self {
            IgnitionFault::ModelLoad(_) => 2,
            IgnitionFault::StoreInit(_) => 3,
        }
    }
}

pub struct CollectorKernel {
    pub application_shared_state: AppState,
}

impl CollectorKernel {
    /**
     * Realiza la ignición del trío cognitivo, el cliente táctico y el
     * estado compartido. El orden es imperativo: artefactos primero
     * (fail fast), Ledger después, socket al final.
     */
    #[instrument(skip(config))]
    pub async fn ignite(config: CollectorConfig) -> Result<Self, IgnitionFault> {
        info!("🛰️  [COLLECTOR]: Global ignition sequence starting...");

        // 1. TRÍO COGNITIVO (rehúsa arrancar con un artefacto incoherente)
        let artifact_set = ArtifactSet::load(
            &config.supervised_model_path,
            &config.unsupervised_model_path,
            &config.secondary_model_path,
        )?;

        // 2. LEDGER TÁCTICO (esquema + índices en el bootstrap)
        let database_client = TursoClient::connect(&config.database_url, None).await?;

        // 3. ESTADO MAESTRO + DAEMON ESCRITOR
        let application_shared_state =
            AppState::assemble(database_client, artifact_set, config)?;

        Ok(Self { application_shared_state })
    }

    /**
     * Lanza los daemons de fondo y el servidor HTTP principal.
     * Bloquea hasta la señal de terminación y el drenaje ordenado.
     */
    pub async fn launch_collector_operations(self) -> anyhow::Result<()> {
        spawn_cache_warden(self.application_shared_state.geo_enricher.clone());

        let bind_address = self.application_shared_state.config.bind_address;
        let collector_router = create_collector_router(self.application_shared_state);

        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("SOCKET_BIND_FAULT: {}", bind_address))?;

        info!("🚀 [COLLECTOR_ONLINE]: System fully operational on {}.", bind_address);

        // El drenaje queda acotado: las peticiones en vuelo están
        // limitadas por el deadline de 5 s del TimeoutLayer, muy por
        // debajo del presupuesto de apagado de 10 s.
        axum::serve(listener, collector_router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP_SURFACE_COLLAPSE")?;

        info!("🛑 [COLLECTOR]: In-flight work drained, store links closing.");
        Ok(())
    }
}

/// Espera SIGINT (Ctrl-C) o SIGTERM para iniciar el apagado coordinado.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }

    info!("📡 [COLLECTOR]: Termination signal received, refusing new connections.");
}
// FIN DEL ARCHIVO [apps/collector/src/kernel.rs]
