use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::identity::ensure_owner_or_admin;
use crate::model::{MaintenanceCreate, MaintenanceRequest, MaintenanceUpdate};

use super::extract::{label, CurrentUser, JsonBody};
use super::{AppState, LIST_LIMIT};

#[derive(Debug, Default, Deserialize)]
pub(super) struct StatusFilter {
    #[serde(default)]
    pub(super) status: Option<String>,
}

pub(super) async fn my_requests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<Vec<MaintenanceRequest>>> {
    let status = filter.status.filter(|s| !s.is_empty());
    let mut requests = state.store.0.lock().find::<MaintenanceRequest>(|r| {
        r.user_id == user.user_id && status.as_deref().map_or(true, |s| label(&r.status) == s)
    })?;
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    requests.truncate(LIST_LIMIT);
    Ok(Json(requests))
}

pub(super) async fn create_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(body): JsonBody<MaintenanceCreate>,
) -> AppResult<Json<MaintenanceRequest>> {
    let request = body.into_request(&user.user_id);
    state.store.0.lock().insert(&request)?;
    info!(
        target: "dormhub::maintenance",
        "request {} type={} urgency={} by {}", request.request_id, request.request_type, label(&request.urgency), user.user_id
    );
    Ok(Json(request))
}

pub(super) async fn update_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(request_id): Path<String>,
    JsonBody(update): JsonBody<MaintenanceUpdate>,
) -> AppResult<Json<MaintenanceRequest>> {
    let mut guard = state.store.0.lock();
    let Some(request) = guard.get::<MaintenanceRequest>(&request_id)? else {
        return Err(AppError::not_found("request_not_found", "Maintenance request not found"));
    };
    ensure_owner_or_admin(&user, &request.user_id)?;
    let now = Utc::now();
    let updated = guard.update::<MaintenanceRequest>(&request_id, |r| update.apply(r, now))?;
    Ok(Json(updated.unwrap_or(request)))
}
