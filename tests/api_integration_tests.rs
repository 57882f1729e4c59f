//! API Integration Tests
//!
//! Drives the full router with `oneshot` requests. Every test gets its own temporary data
//! directory, so the message file and the user database are never shared between tests.

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;
use vulnlab::api::search::encode_uri_component;
use vulnlab::api::{self, AppState};
use vulnlab::infrastructure::database::DatabaseConnection;
use vulnlab::server;

const SCRIPT_PAYLOAD: &str = "<script>alert('xss')</script>";
const IMG_PAYLOAD: &str = "<img src='x' onerror='alert(\"stored xss\")'>";

struct TestApp {
    router: Router,
    database: Arc<DatabaseConnection>,
    _dir: TempDir,
}

async fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let database = Arc::new(DatabaseConnection::new(dir.path().join("users.db")));
    database.initialize().await.unwrap();

    let state = AppState::new(database.clone(), dir.path().join("messages.json")).unwrap();

    TestApp {
        router: api::router(state),
        database,
        _dir: dir,
    }
}

impl TestApp {
    async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_message(&self, uri: &str, message: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(format!("message={}", encode_uri_component(message))))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_page() {
    let app = setup_app().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("Basic Rust Server for Cybersecurity Education"));
    assert!(text.contains("Welcome!"));
}

#[tokio::test]
async fn test_vuln_reflected_echoes_raw_input() {
    let app = setup_app().await;

    let response = app
        .get(&format!("/vuln_reflected?q={}", encode_uri_component(SCRIPT_PAYLOAD)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(SCRIPT_PAYLOAD));
}

#[tokio::test]
async fn test_safe_reflected_escapes_input() {
    let app = setup_app().await;

    let response = app
        .get(&format!("/safe_reflected?q={}", encode_uri_component(SCRIPT_PAYLOAD)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(!text.contains(SCRIPT_PAYLOAD));
    assert!(!text.contains("<script>"));
    assert!(text.contains("&lt;script&gt;alert("));
}

#[tokio::test]
async fn test_reflected_without_query_shows_placeholder() {
    let app = setup_app().await;

    for uri in ["/vuln_reflected", "/safe_reflected", "/safe_reflected?q="] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("(nothing)"), "{uri}");
    }
}

#[tokio::test]
async fn test_stored_vuln_reflects_raw_message() {
    let app = setup_app().await;

    let response = app.post_message("/stored_vuln", IMG_PAYLOAD).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/stored_vuln");

    let response = app.get("/stored_vuln").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(IMG_PAYLOAD));
}

#[tokio::test]
async fn test_stored_safe_escapes_message() {
    let app = setup_app().await;

    let response = app.post_message("/stored_safe", IMG_PAYLOAD).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/stored_safe");

    let response = app.get("/stored_safe").await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(!text.contains(IMG_PAYLOAD));
    assert!(text.contains("&lt;img src="));
    assert!(text.contains("&quot;stored xss&quot;"));
}

#[tokio::test]
async fn test_stored_routes_share_messages() {
    let app = setup_app().await;

    app.post_message("/stored_safe", "first").await;
    app.post_message("/stored_vuln", "second").await;

    let text = body_text(app.get("/stored_vuln").await).await;
    let first = text.find("first").unwrap();
    let second = text.find("second").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_stored_post_without_message_is_ignored() {
    let app = setup_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/stored_vuln")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = app.post_message("/stored_safe", "").await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let text = body_text(app.get("/stored_safe").await).await;
    assert!(text.contains("No messages yet."));
}

#[tokio::test]
async fn test_sql_vuln_returns_all_users_on_injection() {
    let app = setup_app().await;
    let injected = "admin' OR '1'='1' --";

    let response = app
        .get(&format!("/sql_vuln?name={}", encode_uri_component(injected)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("Users Found:"));
    assert!(text.contains("<li><strong>admin</strong> (ID:"));
    assert!(text.contains("<li><strong>user1</strong> (ID:"));
    assert!(text.contains("<li><strong>user2</strong> (ID:"));
}

#[tokio::test]
async fn test_sql_vuln_finds_single_user() {
    let app = setup_app().await;

    let response = app.get("/sql_vuln?name=user1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("Users Found:"));
    assert!(text.contains("<li><strong>user1</strong> (ID:"));
    assert!(!text.contains("<li><strong>admin</strong>"));
}

#[tokio::test]
async fn test_sql_vuln_broken_query_is_server_error() {
    let app = setup_app().await;

    let response = app
        .get(&format!("/sql_vuln?name={}", encode_uri_component("O'Brien")))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_sql_vuln_cannot_delete_users() {
    let app = setup_app().await;
    let stacked = "x'; DELETE FROM users; --";

    app.get(&format!("/sql_vuln?name={}", encode_uri_component(stacked)))
        .await;

    let response = app
        .get(&format!("/sql_vuln?name={}", encode_uri_component("admin' OR '1'='1' --")))
        .await;
    let text = body_text(response).await;
    assert!(text.contains("<li><strong>admin</strong> (ID:"));
    assert!(text.contains("<li><strong>user1</strong> (ID:"));
    assert!(text.contains("<li><strong>user2</strong> (ID:"));
}

#[tokio::test]
async fn test_sql_safe_is_not_injectable() {
    let app = setup_app().await;
    let injected = "admin' OR '1'='1' --";

    let response = app
        .get(&format!("/sql_safe?name={}", encode_uri_component(injected)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(text.contains("No user found with name: <strong>admin"));
    assert!(!text.contains(injected));
    assert!(!text.contains("User Found:"));
}

#[tokio::test]
async fn test_sql_safe_finds_user() {
    let app = setup_app().await;

    let response = app.get("/sql_safe?name=user2").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("User Found: <strong>user2</strong>")
    );
}

#[tokio::test]
async fn test_sql_safe_unknown_user() {
    let app = setup_app().await;

    let response = app.get("/sql_safe?name=nonexistent").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("No user found with name: <strong>nonexistent</strong>")
    );
}

#[tokio::test]
async fn test_sql_routes_fail_when_store_closed() {
    let app = setup_app().await;
    app.database.close().await;

    let response = app.get("/sql_safe?name=admin").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_api_search_returns_json() {
    let app = setup_app().await;

    let response = app.get("/api/search?q=test_query").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.contains("json"));

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "ok": true, "query": "test_query", "safe": "test_query" })
    );
}

#[tokio::test]
async fn test_api_search_encodes_markup() {
    let app = setup_app().await;

    let response = app
        .get(&format!("/api/search?q={}", encode_uri_component("<b>x y</b>")))
        .await;

    let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["query"], "<b>x y</b>");
    assert_eq!(json["safe"], "%3Cb%3Ex%20y%3C%2Fb%3E");
}

#[tokio::test]
async fn test_reset_data_restores_stores() {
    let app = setup_app().await;
    app.post_message("/stored_vuln", "to be removed").await;
    let pool = app.database.pool().await.unwrap();
    sqlx::query("INSERT INTO users (name, password) VALUES ('eve', 'x')")
        .execute(&pool)
        .await
        .unwrap();

    let response = app.get("/reset-data").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Data reset.");

    let text = body_text(app.get("/stored_vuln").await).await;
    assert!(!text.contains("to be removed"));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 3);
}

#[tokio::test]
async fn test_request_with_client_address_is_served() {
    let app = setup_app().await;
    let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_serve_answers_and_closes_store_on_shutdown() {
    let app = setup_app().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(server::serve(
        listener,
        app.router.clone(),
        app.database.clone(),
        async move {
            stop_rx.await.ok();
        },
    ));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /vuln_reflected?q=hi HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"));

    stop_tx.send(()).unwrap();
    handle.await.unwrap().unwrap();

    assert!(!app.database.is_open().await);
}

#[tokio::test]
async fn test_serve_closes_store_when_shutdown_is_immediate() {
    let app = setup_app().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    server::serve(listener, app.router.clone(), app.database.clone(), async {})
        .await
        .unwrap();

    assert!(!app.database.is_open().await);
    assert!(app.database.pool().await.is_err());
}
