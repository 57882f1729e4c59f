//! SQL injection demos

use crate::api::{ApiError, AppState};
use crate::infrastructure::repositories::unsafe_lookup_query;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use minijinja::context;
use serde::Deserialize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sql_vuln", get(sql_vuln))
        .route("/sql_safe", get(sql_safe))
}

#[derive(Deserialize, Debug, Default)]
pub struct LookupParams {
    pub name: Option<String>,
}

fn requested_name(params: Option<Query<LookupParams>>) -> Option<String> {
    params
        .and_then(|Query(p)| p.name)
        .filter(|name| !name.is_empty())
}

/// Renders every row the concatenated query returns.
async fn sql_vuln(
    State(state): State<AppState>,
    params: Option<Query<LookupParams>>,
) -> Result<Html<String>, ApiError> {
    let Some(name) = requested_name(params) else {
        return state.render("sql_vuln.html", context! { searched => false });
    };

    let users = state.users.find_by_name_unsafe(&name).await?;

    state.render(
        "sql_vuln.html",
        context! {
            searched => true,
            query => unsafe_lookup_query(&name),
            name => name,
            users => users,
        },
    )
}

/// Renders the first match of the parameterized query, if any.
async fn sql_safe(
    State(state): State<AppState>,
    params: Option<Query<LookupParams>>,
) -> Result<Html<String>, ApiError> {
    let Some(name) = requested_name(params) else {
        return state.render("sql_safe.html", context! { searched => false });
    };

    let user = state.users.find_by_name_safe(&name).await?;

    state.render(
        "sql_safe.html",
        context! {
            searched => true,
            name => name,
            user => user,
        },
    )
}
