//! Serving loop

use crate::infrastructure::database::DatabaseConnection;
use axum::Router;
use log::info;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serves `app` until `shutdown` resolves, then closes the user store.
///
/// The store is closed whether the server stopped cleanly or with an error.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    database: Arc<DatabaseConnection>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await;

    info!("Shutting down...");
    database.close().await;
    result
}
