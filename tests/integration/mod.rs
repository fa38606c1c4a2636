//! Integration tests for the ECS health server.
//!
//! Each test binds a real listener on an ephemeral loopback port and talks to
//! it over HTTP.
//!
//! Run with: cargo test --test integration

use std::net::SocketAddr;

use ecs_health_server::api::{create_router, AppState};
use ecs_health_server::config::Config;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Start a server with the given environment and return its base URL.
async fn spawn_server(vars: &[(&str, &str)]) -> String {
    let config = Config::from_vars(
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    )
    .expect("test configuration should load");

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let router = create_router(AppState::new(config));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });

    format!("http://{}", addr)
}

async fn get_json(url: &str) -> (reqwest::StatusCode, Value) {
    let response = reqwest::get(url).await.expect("request failed");
    let status = response.status();
    let body = response.json().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn health_reports_healthy_with_uptime() {
    let base = spawn_server(&[]).await;

    let (status, body) = get_json(&format!("{}/health", base)).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime"].as_f64().expect("uptime is a number") >= 0.0);

    let timestamp = body["timestamp"].as_str().expect("timestamp is a string");
    assert_eq!(timestamp.len(), "2024-01-02T03:04:05.000Z".len());
}

#[tokio::test]
async fn app_name_is_reported_identically() {
    let base = spawn_server(&[("APP_NAME", "payments"), ("NODE_ENV", "production")]).await;

    let (_, root) = get_json(&format!("{}/", base)).await;
    let (_, info) = get_json(&format!("{}/api/info", base)).await;

    assert_eq!(root["app"], "payments");
    assert_eq!(info["app"], "payments");
    assert_eq!(root["environment"], "production");
    assert_eq!(info["environment"], "production");
}

#[tokio::test]
async fn info_reports_configured_port_and_memory() {
    let base = spawn_server(&[("PORT", "8081")]).await;

    let (status, body) = get_json(&format!("{}/api/info", base)).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body["port"], 8081);

    let parse_mb = |v: &Value| -> u64 {
        v.as_str()
            .and_then(|s| s.strip_suffix("MB"))
            .and_then(|s| s.parse().ok())
            .expect("memory figure like 12MB")
    };
    assert!(parse_mb(&body["memory"]["used"]) <= parse_mb(&body["memory"]["total"]));
}

#[tokio::test]
async fn echo_round_trips_json_body() {
    let base = spawn_server(&[]).await;
    let payload = json!({ "x": 1, "tags": ["a", "b"], "nested": { "ok": true } });

    let response = reqwest::Client::new()
        .post(format!("{}/api/echo", base))
        .json(&payload)
        .send()
        .await
        .expect("request failed");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.expect("json body");
    assert_eq!(body["message"], "Echo endpoint");
    assert_eq!(body["received"], payload);
}

#[tokio::test]
async fn echo_rejects_malformed_body() {
    let base = spawn_server(&[]).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/echo", base))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"x\":")
        .send()
        .await
        .expect("request failed");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn echo_treats_empty_or_untyped_body_as_empty_object() {
    let base = spawn_server(&[]).await;
    let client = reqwest::Client::new();

    let empty = client
        .post(format!("{}/api/echo", base))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .send()
        .await
        .expect("request failed");
    assert_eq!(empty.status(), reqwest::StatusCode::OK);
    let body: Value = empty.json().await.expect("json body");
    assert_eq!(body["received"], json!({}));

    let untyped = client
        .post(format!("{}/api/echo", base))
        .body("x=1")
        .send()
        .await
        .expect("request failed");
    assert_eq!(untyped.status(), reqwest::StatusCode::OK);
    let body: Value = untyped.json().await.expect("json body");
    assert_eq!(body["received"], json!({}));
}

#[tokio::test]
async fn secret_reflects_configuration() {
    let base = spawn_server(&[("APP_SECRET", "s3cr3t")]).await;
    let (status, body) = get_json(&format!("{}/secret", base)).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(body, json!({ "secret": "s3cr3t" }));

    let base = spawn_server(&[]).await;
    let (_, body) = get_json(&format!("{}/secret", base)).await;
    assert_eq!(body, json!({ "secret": null }));
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let base = spawn_server(&[]).await;

    let (status, body) = get_json(&format!("{}/nonexistent", base)).await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}
