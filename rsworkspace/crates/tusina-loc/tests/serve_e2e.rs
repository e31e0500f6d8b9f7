//! End-to-end tests for the lookup server over real TCP.
//!
//! Starts `serve` on a local port with an in-memory store and talks to it
//! with reqwest, the way the browser page does.
//!
//! Run with:
//!   cargo test -p tusina-loc --test serve_e2e

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use tusina_loc::env::InMemoryEnv;
use tusina_loc::{LocConfig, serve};
use tusina_store::{LookupToken, MemoryStore};

const PAGE_ORIGIN: &str = "https://ollijuutilainen.github.io";

static PORT_COUNTER: AtomicU16 = AtomicU16::new(28700);

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

async fn wait_for_port(port: u16, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        match tokio::net::TcpStream::connect(format!("127.0.0.1:{port}")).await {
            Ok(_) => return,
            Err(_) => {
                if tokio::time::Instant::now() >= deadline {
                    panic!("Port {port} not ready within {timeout:?}");
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}

/// Start the server in a background task with one seeded record.
async fn spawn_server(token: &str, raw: &str) -> u16 {
    let port = next_port();
    let env = InMemoryEnv::new();
    env.set("LOC_PORT", port.to_string());
    env.set("LOC_ALLOWED_ORIGINS", PAGE_ORIGIN);
    let config = LocConfig::from_env(&env);

    let store = MemoryStore::new();
    store.insert(&LookupToken::new(token).unwrap(), raw).unwrap();

    tokio::spawn(async move {
        serve(config, store).await.expect("server error");
    });

    wait_for_port(port, Duration::from_secs(5)).await;
    port
}

#[tokio::test]
async fn page_fetch_gets_record_and_cors_headers() {
    let port = spawn_server("page_token_000001", r#"{"v":1,"iv":"aXY=","ct":"Y3Q=","note":"x"}"#).await;

    let resp = reqwest::Client::new()
        .get(format!("http://127.0.0.1:{port}/api/loc?t=page_token_000001"))
        .header("Origin", PAGE_ORIGIN)
        .send()
        .await
        .expect("HTTP request failed");

    assert_eq!(resp.status(), 200);
    let headers = resp.headers().clone();
    assert_eq!(headers["access-control-allow-origin"], PAGE_ORIGIN);
    assert_eq!(headers["cache-control"], "no-store");
    assert_eq!(headers["vary"], "Origin");

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"v": 1, "iv": "aXY=", "ct": "Y3Q="}));
}

#[tokio::test]
async fn foreign_origin_preflight_gets_null() {
    let port = spawn_server("page_token_000002", r#"{"v":1,"iv":"a","ct":"b"}"#).await;

    let resp = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://127.0.0.1:{port}/api/loc"))
        .header("Origin", "https://evil.example")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("HTTP request failed");

    assert_eq!(resp.status(), 204);
    assert_eq!(resp.headers()["access-control-allow-origin"], "null");
    assert_eq!(resp.headers()["access-control-allow-methods"], "GET, OPTIONS");
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_token_over_tcp_is_404_json() {
    let port = spawn_server("page_token_000003", r#"{"v":1,"iv":"a","ct":"b"}"#).await;

    let resp = reqwest::get(format!("http://127.0.0.1:{port}/api/loc?t=someone_elses_tok"))
        .await
        .expect("HTTP request failed");

    assert_eq!(resp.status(), 404);
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "not_found"}));
}
