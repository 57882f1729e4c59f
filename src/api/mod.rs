use crate::core::services::{FileMessageBoardService, StoreMaintenanceService};
use crate::core::templates::Templates;
use crate::core::traits::{MaintenanceService, MessageBoardService};
use crate::infrastructure::StoreError;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::repositories::{DbUserRepository, JsonMessageRepository};
use crate::infrastructure::traits::{MessageRepository, UserRepository};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{error, info};
use minijinja::context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub mod maintenance;
pub mod search;
pub mod sql;
pub mod xss;

pub const SITE_TITLE: &str = "Basic Rust Server for Cybersecurity Education";

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<Templates>,
    pub messages: Arc<dyn MessageBoardService>,
    pub users: Arc<dyn UserRepository>,
    pub maintenance: Arc<dyn MaintenanceService>,
}

impl AppState {
    /// Wires the default services over the given user-store handle and message file.
    pub fn new(
        database: Arc<DatabaseConnection>,
        messages_path: impl Into<PathBuf>,
    ) -> Result<AppState, minijinja::Error> {
        let message_repo: Arc<dyn MessageRepository> =
            Arc::new(JsonMessageRepository::new(messages_path));
        let user_repo: Arc<dyn UserRepository> = Arc::new(DbUserRepository::new(database));

        Ok(AppState {
            templates: Arc::new(Templates::new()?),
            messages: Arc::new(FileMessageBoardService::new(message_repo.clone())),
            users: user_repo.clone(),
            maintenance: Arc::new(StoreMaintenanceService::new(message_repo, user_repo)),
        })
    }

    pub(crate) fn render<S: serde::Serialize>(
        &self,
        name: &str,
        ctx: S,
    ) -> Result<Html<String>, ApiError> {
        Ok(Html(self.templates.render(name, ctx)?))
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{self}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// All demo routes with request logging applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(xss::router())
        .merge(sql::router())
        .merge(maintenance::router())
        .nest("/api", search::router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state.render(
        "index.html",
        context! {
            title => SITE_TITLE,
            message => "Welcome!",
        },
    )
}

/// Logs every request with the client address when the server provides one.
async fn log_request(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    match connect_info {
        Some(ConnectInfo(addr)) => {
            info!("Request: {} {} from {}", request.method(), request.uri(), addr.ip())
        }
        None => info!("Request: {} {} from unknown", request.method(), request.uri()),
    }
    next.run(request).await
}
