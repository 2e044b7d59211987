//! Shared fixtures for integration tests.
//!
//! Writes a complete artifact directory with simple, hand-checkable
//! models:
//!
//! - product `id`: mean of the 14-day history plus `id`
//! - total sales: sum of the history (linear-kernel SVR)
//! - coffee: `7.0 - 0.5 * month` (falls through the year)
//! - tea: `2.0 + 0.25 * month` (rises through the year)

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use brewcast::config::{AppConfig, ModelsConfig};
use brewcast::dashboard::routes::{AppState, DashboardState};
use brewcast::registry::ModelRegistry;

pub const PRODUCT_COUNT: u32 = 78;

pub const HISTORY: [f64; 14] = [
    10.0, 12.0, 11.0, 13.0, 12.0, 14.0, 13.0, 15.0, 14.0, 16.0, 15.0, 17.0, 16.0, 18.0,
];

pub const HISTORY_TEXT: &str = "10,12,11,13,12,14,13,15,14,16,15,17,16,18";

pub fn write_model_dir(dir: &Path) {
    for id in 1..=PRODUCT_COUNT {
        write(
            dir,
            &format!("svr_model_productid_{id}.json"),
            json!({
                "kind": "linear",
                "intercept": f64::from(id),
                "coefficients": vec![1.0 / 14.0; 14],
            }),
        );
    }
    write(
        dir,
        "svr_model_total_sales.json",
        json!({
            "kind": "svr",
            "kernel": {"type": "linear"},
            "intercept": 0.0,
            "support_vectors": [vec![1.0; 14]],
            "dual_coef": [1.0],
        }),
    );
    write(
        dir,
        "coffee_model.json",
        json!({"kind": "linear", "intercept": 7.0, "coefficients": [0.0, -0.5]}),
    );
    write(
        dir,
        "tea_model.json",
        json!({"kind": "linear", "intercept": 2.0, "coefficients": [0.0, 0.25]}),
    );
}

fn write(dir: &Path, name: &str, artifact: serde_json::Value) {
    std::fs::write(dir.join(name), artifact.to_string()).unwrap();
}

pub fn app_config(dir: &Path) -> AppConfig {
    AppConfig {
        models: ModelsConfig {
            dir: dir.to_path_buf(),
            ..ModelsConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Dashboard state backed by a fresh temp directory, returned with
/// its guard.
pub fn app_state() -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    write_model_dir(dir.path());
    let cfg = app_config(dir.path());
    let registry = ModelRegistry::load(&cfg.models).unwrap();
    (dir, Arc::new(DashboardState::new(registry, &cfg)))
}

pub fn price_request(commodity: &str, year: i32, month: u32) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/predict/price/{commodity}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"year": year, "month": month}).to_string()))
        .unwrap()
}

/// Build a multipart sales request. `file` is `(file_name, contents)`.
pub fn sales_request(fields: &[(&str, &str)], file: Option<(&str, &str)>) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--BREWCASTBOUNDARY\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some((file_name, contents)) = file {
        body.push_str(&format!(
            "--BREWCASTBOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/csv\r\n\r\n{contents}\r\n"
        ));
    }
    body.push_str("--BREWCASTBOUNDARY--\r\n");

    Request::builder()
        .method("POST")
        .uri("/api/predict/sales")
        .header("content-type", "multipart/form-data; boundary=BREWCASTBOUNDARY")
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
