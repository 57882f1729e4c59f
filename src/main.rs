//! Intentionally vulnerable web server for classroom security demos
//!
//! (c) vulnlab contributors 2026

use vulnlab::api;
use vulnlab::api::AppState;
use vulnlab::config::Config;
use vulnlab::infrastructure::database::DatabaseConnection;
use vulnlab::{logging, server};

use axum::http::Method;
use log::{info, warn};
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // initialize tracing, keep the file writers alive until exit
    let _log_guards = logging::init(&config.log_dir);

    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(web_server_task(config))
}

async fn web_server_task(config: Config) -> anyhow::Result<()> {
    // the user store must be ready before the first request
    let database = Arc::new(DatabaseConnection::new(config.database_path()));
    database.initialize().await?;

    let state = AppState::new(database.clone(), config.messages_path())?;

    let app = api::router(state)
        .nest_service(
            "/static",
            ServiceBuilder::new().service(ServeDir::new(&config.static_dir)),
        )
        .layer(
            CorsLayer::new()
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_origin(Any),
        );

    let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    warn!(
        "WARNING: This server contains intentionally vulnerable code for classroom use only. DO NOT deploy publicly."
    );

    server::serve(listener, app, database, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
