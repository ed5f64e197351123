use std::sync::Arc;

use devices_core::repository::DeviceRepository;
use devices_db::{DbConfig, PgDeviceRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devices_api::config::ServerConfig;
use devices_api::router::build_app_router;
use devices_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "devices_api=debug,devices_db=debug,tower_http=debug".into()
            }),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(
        addr = %config.addr,
        cors = ?config.cors_origins,
        timeout = ?config.request_timeout,
        "Loaded server configuration"
    );

    let db_config = DbConfig::from_env();
    tracing::info!(
        host = %db_config.host,
        port = db_config.port,
        database = %db_config.database,
        schema = %db_config.schema,
        "Loaded database configuration"
    );

    // --- Database ---
    let pg_repo = PgDeviceRepository::connect(&db_config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    devices_db::health_check(pg_repo.pool())
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    devices_db::run_migrations(pg_repo.pool())
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let repo: Arc<dyn DeviceRepository> = Arc::new(pg_repo);

    // --- App state ---
    let state = AppState {
        repo: Arc::clone(&repo),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(addr = %config.addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let Err(e) = repo.close().await {
        tracing::error!(error = %e, "Failed to close device repository");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
