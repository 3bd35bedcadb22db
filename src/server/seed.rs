use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{AppError, AppResult};

use super::AppState;

/// Development seeding; answers 404 unless enabled in the configuration.
pub(super) async fn seed_data(State(state): State<AppState>) -> AppResult<Json<Value>> {
    if !state.config.seed_endpoint {
        return Err(AppError::not_found("not_found", "Not found"));
    }
    let inserted = crate::seed::seed_all(&state.store)?;
    info!(target: "dormhub::seed", "seed endpoint inserted {} documents", inserted);
    Ok(Json(json!({ "message": "Seed data created successfully", "inserted": inserted })))
}
