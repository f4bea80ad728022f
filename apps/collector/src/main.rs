// [apps/collector/src/main.rs]
/*!
 * =================================================================
 * APARATO: COLLECTOR MAIN ENTRY POINT (V10.0 - GOLD MASTER)
 * CLASIFICACIÓN: APPLICATION SHELL (ESTRATO L3)
 * RESPONSABILIDAD: BOOTSTRAP DE INFRAESTRUCTURA E IGNICIÓN SEGURA
 *
 * # Mathematical Proof (Deterministic Ignition):
 * El proceso garantiza que la carga del trío cognitivo ocurra antes
 * que la apertura del socket TCP, previniendo estados de carrera
 * donde un frontal despache eventos hacia un colector sin modelos.
 *
 * # Códigos de Salida:
 * 0 terminación normal · 1 configuración inválida ·
 * 2 colapso de artefacto de modelo · 3 fallo de arranque del Ledger.
 * =================================================================
 */

use senuelo_collector::prelude::*;

use dotenvy::dotenv;
use senuelo_shared_heimdall::init_tracing;
use tracing::error;

/**
 * Punto de ignición supremo del binario del Colector.
 */
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. CARGA DE ENTORNO SOBERANO
    // Hidrata las variables de .env en el espacio de nombres del proceso.
    dotenv().ok();

    // 2. INICIALIZACIÓN DE OBSERVABILIDAD NEURAL (HEIMDALL)
    init_tracing("senuelo_collector");

    // 3. CONSTRUCCIÓN DEL RUNTIME SOBERANO
    let runtime_collector = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime_collector.block_on(async {
        // 4. CAPTURA TIPADA DEL ENTORNO (única lectura del proceso)
        let collector_config = match CollectorConfig::from_env() {
            Ok(config) => config,
            Err(config_fault) => {
                error!("❌ [CONFIG_FAULT]: {}", config_fault);
                std::process::exit(1);
            }
        };

        // 5. IGNICIÓN DEL KERNEL (artefactos -> Ledger -> estado)
        let kernel_instance = match CollectorKernel::ignite(collector_config).await {
            Ok(kernel) => kernel,
            Err(ignition_fault) => {
                error!("❌ [IGNITION_FAULT]: {}", ignition_fault);
                std::process::exit(ignition_fault.exit_code());
            }
        };

        // 6. OPERACIONES: daemons de fondo + superficie HTTP
        if let Err(runtime_fault) = kernel_instance.launch_collector_operations().await {
            error!("❌ [RUNTIME_FAULT]: {}", runtime_fault);
            std::process::exit(1);
        }
    });

    Ok(())
}
