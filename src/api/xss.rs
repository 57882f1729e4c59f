//! Cross-site scripting demos
//!
//! Each vulnerable route has a safe twin that differs only in its template: the vulnerable
//! template marks user input `safe`, the other lets the template engine escape it.

use crate::api::{ApiError, AppState};
use axum::extract::{Form, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use minijinja::context;
use serde::Deserialize;

/// Shown when no query was given.
pub const NOTHING: &str = "(nothing)";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vuln_reflected", get(vuln_reflected))
        .route("/safe_reflected", get(safe_reflected))
        .route("/stored_vuln", get(stored_vuln).post(post_stored_vuln))
        .route("/stored_safe", get(stored_safe).post(post_stored_safe))
}

#[derive(Deserialize, Debug, Default)]
pub struct ReflectParams {
    pub q: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct MessageForm {
    pub message: Option<String>,
}

async fn vuln_reflected(
    State(state): State<AppState>,
    params: Option<Query<ReflectParams>>,
) -> Result<Html<String>, ApiError> {
    render_reflected(&state, "vuln_reflected.html", params)
}

async fn safe_reflected(
    State(state): State<AppState>,
    params: Option<Query<ReflectParams>>,
) -> Result<Html<String>, ApiError> {
    render_reflected(&state, "safe_reflected.html", params)
}

fn render_reflected(
    state: &AppState,
    template: &str,
    params: Option<Query<ReflectParams>>,
) -> Result<Html<String>, ApiError> {
    let q = params
        .and_then(|Query(p)| p.q)
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| NOTHING.to_owned());

    state.render(template, context! { q => q })
}

async fn stored_vuln(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let messages = state.messages.list_messages().await;
    state.render("stored_vuln.html", context! { messages => messages })
}

async fn stored_safe(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let messages = state.messages.list_messages().await;
    state.render("stored_safe.html", context! { messages => messages })
}

async fn post_stored_vuln(
    State(state): State<AppState>,
    form: Option<Form<MessageForm>>,
) -> Response {
    store_message(&state, form).await;
    found("/stored_vuln")
}

async fn post_stored_safe(
    State(state): State<AppState>,
    form: Option<Form<MessageForm>>,
) -> Response {
    store_message(&state, form).await;
    found("/stored_safe")
}

async fn store_message(state: &AppState, form: Option<Form<MessageForm>>) {
    if let Some(text) = form.and_then(|Form(f)| f.message) {
        state.messages.post_message(&text).await;
    }
}

/// 302 Found. `Redirect::to` would answer 303.
fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
