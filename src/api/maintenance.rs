//! Maintenance endpoint. Not part of the demos; used to put the stores back in a known state.

use crate::api::{ApiError, AppState};
use axum::extract::State;
use axum::routing::get;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().route("/reset-data", get(reset_data))
}

async fn reset_data(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    state.maintenance.reset_data().await?;
    Ok("Data reset.")
}
