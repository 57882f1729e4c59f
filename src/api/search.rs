//! JSON echo endpoint

use crate::api::AppState;
use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Everything except the characters JavaScript's `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn router() -> Router<AppState> {
    Router::new().route("/search", get(search))
}

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SearchResponse {
    pub ok: bool,
    pub query: String,
    pub safe: String,
}

async fn search(params: Option<Query<SearchParams>>) -> Json<SearchResponse> {
    let query = params.and_then(|Query(p)| p.q).unwrap_or_default();

    Json(SearchResponse {
        ok: true,
        safe: encode_uri_component(&query),
        query,
    })
}
