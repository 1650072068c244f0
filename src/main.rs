mod client;
mod config;
mod database;
mod models;
mod repositories;
mod services;
mod utils;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::{error, info};

use client::FrotcomClient;
use config::environment::EnvironmentConfig;
use database::connection::create_pool;
use repositories::route_repository::PgRouteRepository;
use services::route_display_service::RouteDisplayService;
use services::route_processing_service::{RouteProcessingService, SyncStatus};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚀 Sincronización de Plantillas de Rutas - API Frotcom");
    info!("=====================================================");

    // La configuración se valida completa antes de tocar red o base de datos
    let config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        e
    })?;

    let pool = match create_pool(Some(&config.database_url)).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(e);
        }
    };

    let api_client = Arc::new(FrotcomClient::new(config.api.clone(), config.auth.clone())?);
    let repository = Arc::new(PgRouteRepository::new(pool));

    // Cancelación cooperativa: Ctrl+C marca el flag y el pipeline lo honra
    // en el siguiente límite de etapa
    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_shutdown_watcher(shutdown.clone());

    let pipeline = RouteProcessingService::new(api_client.clone(), repository, shutdown);

    let outcome = match pipeline.fetch_and_persist().await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("💥 Error crítico en la sincronización: {}", e);
            return Err(e.into());
        }
    };

    match outcome.status {
        SyncStatus::Completed => info!(
            "✅ Sincronización finalizada: {} rutas procesadas",
            outcome.record_count
        ),
        SyncStatus::NoRecords => info!("⚠️ Sincronización finalizada sin rutas que procesar"),
    }

    // Vista de consola de las mismas plantillas; un fallo aquí no altera el
    // resultado de la sincronización
    let display = RouteDisplayService::new(api_client);
    display.display_all_route_templates().await;

    info!("👋 Aplicación finalizada");
    Ok(())
}

/// Observa la señal Ctrl+C y marca el flag de apagado
fn spawn_shutdown_watcher(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("🛑 Señal Ctrl+C recibida, cancelando el pipeline...");
            shutdown.store(true, Ordering::Relaxed);
        }
    });
}
