use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleet_admin::config::{DatabaseConfig, EnvironmentConfig};
use fleet_admin::database;
use fleet_admin::middleware::cors::cors_layer;
use fleet_admin::repositories::CarRepository;
use fleet_admin::routes::create_app_router;
use fleet_admin::services::SessionGate;
use fleet_admin::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Sin contraseña de administrador o sin base de datos no se arranca
    let config = EnvironmentConfig::from_env().context("invalid configuration")?;

    // Configurar logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚗 Fleet Admin - Panel de administración de la flota");
    info!("===================================================");

    let session_gate = SessionGate::new(config.auth_config()?);

    // Inicializar base de datos
    let pool = database::connect(&DatabaseConfig::from_url(&config.database_url)).await?;
    database::run_migrations(&pool).await?;

    let state = AppState::new(
        Arc::new(CarRepository::new(pool)),
        session_gate,
        config.form_variant(),
    );
    let app = create_app_router(state).layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST   /api/auth/login - Iniciar sesión");
    info!("   POST   /api/auth/logout - Cerrar sesión");
    info!("   GET    /login - Página de login");
    info!("   GET    /dashboard - Estadísticas de la flota");
    info!("   GET    /dashboard/cars - Listar coches (sort, direction)");
    info!("   POST   /dashboard/cars/add - Añadir coche");
    info!("   GET    /dashboard/cars/:id - Obtener coche");
    info!("   POST   /dashboard/cars/:id/edit - Editar coche");
    info!("   DELETE /dashboard/cars/:id - Eliminar coche");
    info!("   GET    /health - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
