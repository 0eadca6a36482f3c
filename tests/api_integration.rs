//! REST API integration tests
//!
//! These tests start an actual server on an ephemeral port and exercise the
//! full HTTP stack.

use quotecast::{AppConfig, Server};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Start a test server and return its address.
async fn start_test_server() -> SocketAddr {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    // Keep the publish loop quiet during REST tests
    config.stream.interval_ms = 60_000;

    let server = Server::new(config);
    let app = server.router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    addr
}

async fn get_json(url: &str) -> (u16, Value) {
    let response = reqwest::Client::new().get(url).send().await.unwrap();
    let status = response.status().as_u16();
    let body: Value = response.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn test_list_stocks_default() {
    let addr = start_test_server().await;

    let (status, body) = get_json(&format!("http://{}/api/stocks", addr)).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 7);

    let first = &data[0];
    assert!(first.get("companyName").is_some());
    assert!(first.get("pChange").is_some());
    assert!(first.get("lastUpdated").is_some());
    // Quotes were repriced on fetch, so derived fields must be consistent
    let ltp: f64 = first["ltp"].as_str().map_or_else(
        || first["ltp"].as_f64().unwrap(),
        |s| s.parse().unwrap(),
    );
    assert!(ltp > 0.0);
}

#[tokio::test]
async fn test_list_stocks_exchange_filter_is_case_insensitive() {
    let addr = start_test_server().await;

    let (status, body) = get_json(&format!("http://{}/api/stocks?exchange=bse", addr)).await;
    assert_eq!(status, 200);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.iter().all(|q| q["exchange"] == "BSE"));
}

#[tokio::test]
async fn test_list_stocks_symbol_and_limit_filters() {
    let addr = start_test_server().await;

    let (_, body) = get_json(&format!("http://{}/api/stocks?symbols=TCS,INFY", addr)).await;
    let mut symbols: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["symbol"].as_str().unwrap())
        .collect();
    symbols.sort_unstable();
    assert_eq!(symbols, ["INFY", "TCS"]);

    let (_, body) = get_json(&format!("http://{}/api/stocks?limit=3", addr)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_stocks_rejects_unknown_exchange() {
    let addr = start_test_server().await;

    let (status, body) = get_json(&format!("http://{}/api/stocks?exchange=NYSE", addr)).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Invalid exchange"));
}

#[tokio::test]
async fn test_search_stocks() {
    let addr = start_test_server().await;

    let (status, body) =
        get_json(&format!("http://{}/api/stocks/search?query=bank", addr)).await;
    assert_eq!(status, 200);
    let data = body["data"].as_array().unwrap();
    assert!(data.len() >= 3);

    // Search results are the compact projection, not full quotes
    let first = &data[0];
    assert!(first.get("companyName").is_some());
    assert!(first.get("pChange").is_some());
    assert!(first.get("open").is_none());
}

#[tokio::test]
async fn test_search_requires_query() {
    let addr = start_test_server().await;

    let (status, body) = get_json(&format!("http://{}/api/stocks/search", addr)).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn test_stock_details() {
    let addr = start_test_server().await;

    let (status, body) = get_json(&format!("http://{}/api/stocks/RELIANCE", addr)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["symbol"], "RELIANCE");

    let extras = &body["data"]["additionalData"];
    assert!(extras["isin"].as_str().unwrap().starts_with("INE"));
    assert!(extras.get("weekHigh52").is_some());
    assert!(extras.get("bookValue").is_some());
}

#[tokio::test]
async fn test_stock_details_not_found() {
    let addr = start_test_server().await;

    let (status, body) = get_json(&format!("http://{}/api/stocks/WIPRO", addr)).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);

    // Listed symbol, wrong venue
    let (status, _) =
        get_json(&format!("http://{}/api/stocks/RELIANCE?exchange=BSE", addr)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_health_reports_connections() {
    let addr = start_test_server().await;

    let (status, body) = get_json(&format!("http://{}/health", addr)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["connections"], 0);
    assert!(body["timestamp"].is_string());
}
