//! Product Feed Server - Main entry point

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use feed_common::logging::{init_logging, LogConfig};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use feed_server::{
    config::Config,
    export::{
        notify::notifier_from_config, ConfiguredTransport, FeedExportJob, FeedScheduler, Notifier,
        PgProductSource, ProductSource,
    },
    features, middleware,
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("feed-server".to_string())
        .filter_directives("feed_server=debug,tower_http=debug,sqlx=info".to_string())
        .build()
        // LOG_* variables take precedence
        .with_env_overrides()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting Product Feed Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;

    info!("Database connection pool established");

    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Database migrations completed");

    let source: Arc<dyn ProductSource> = Arc::new(PgProductSource::new(db_pool.clone()));

    let export_config = config.export.clone();
    let scheduler_handle = if export_config.enabled {
        let notifier: Arc<dyn Notifier> = Arc::from(notifier_from_config(&export_config.notify)?);
        let job = FeedExportJob::new(
            source.clone(),
            Arc::new(ConfiguredTransport),
            notifier,
            export_config,
        );
        let handle = FeedScheduler::new(Arc::new(job)).start();
        info!("Feed export scheduler started");
        Some(handle)
    } else {
        info!("Feed export is disabled (FEED_EXPORT_ENABLED=false)");
        None
    };

    let app = create_router(db_pool, source, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    if let Some(handle) = scheduler_handle {
        handle.abort();
    }

    info!("Server shut down gracefully");

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_router(db: sqlx::PgPool, source: Arc<dyn ProductSource>, config: &Config) -> Router {
    let feature_routes = features::router(features::FeatureState { source });

    Router::new()
        .route("/health", get(health_check))
        .with_state(db)
        .nest("/api/v1", feature_routes)
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(db): State<sqlx::PgPool>) -> Result<Response, StatusCode> {
    match sqlx::query("SELECT 1").fetch_one(&db).await {
        Ok(_) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected"
            })),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
