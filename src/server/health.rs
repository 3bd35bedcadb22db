use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

pub(super) async fn root() -> Json<Value> {
    Json(json!({ "message": "Dormhub Dormitory Management API", "version": env!("CARGO_PKG_VERSION") }))
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": Utc::now().to_rfc3339() }))
}
