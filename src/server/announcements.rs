use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::config::parse_bool_str;
use crate::error::AppResult;
use crate::model::{Announcement, AnnouncementCreate};

use super::extract::{AdminUser, JsonBody};
use super::AppState;

const ANNOUNCEMENT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub(super) struct AnnouncementFilter {
    #[serde(default)]
    active_only: Option<String>,
}

/// Newest first. Inactive announcements only when `active_only=false`.
pub(super) async fn list_announcements(
    State(state): State<AppState>,
    Query(filter): Query<AnnouncementFilter>,
) -> AppResult<Json<Vec<Announcement>>> {
    let active_only = filter.active_only.as_deref().and_then(parse_bool_str).unwrap_or(true);
    let mut items = state.store.0.lock().find::<Announcement>(|a| !active_only || a.is_active)?;
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(ANNOUNCEMENT_LIMIT);
    Ok(Json(items))
}

pub(super) async fn create_announcement(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(body): JsonBody<AnnouncementCreate>,
) -> AppResult<Json<Announcement>> {
    let announcement = body.into_announcement(&admin.user_id);
    state.store.0.lock().insert(&announcement)?;
    info!(target: "dormhub::announcements", "announcement {} posted by {}", announcement.announcement_id, admin.user_id);
    Ok(Json(announcement))
}
