use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::model::{Room, RoomCreate, RoomUpdate};

use super::extract::{label, AdminUser, JsonBody};
use super::{AppState, LIST_LIMIT};

#[derive(Debug, Default, Deserialize)]
pub(super) struct RoomFilter {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    room_type: Option<String>,
}

fn room_not_found() -> AppError {
    AppError::not_found("room_not_found", "Room not found")
}

/// Public listing, ordered by room number.
pub(super) async fn list_rooms(
    State(state): State<AppState>,
    Query(filter): Query<RoomFilter>,
) -> AppResult<Json<Vec<Room>>> {
    let status = filter.status.filter(|s| !s.is_empty());
    let room_type = filter.room_type.filter(|s| !s.is_empty());
    let mut rooms = state.store.0.lock().find::<Room>(|r| {
        status.as_deref().map_or(true, |s| label(&r.status) == s)
            && room_type.as_deref().map_or(true, |t| r.room_type == t)
    })?;
    rooms.sort_by(|a, b| a.room_number.cmp(&b.room_number));
    rooms.truncate(LIST_LIMIT);
    Ok(Json(rooms))
}

pub(super) async fn get_room(State(state): State<AppState>, Path(room_id): Path<String>) -> AppResult<Json<Room>> {
    state.store.0.lock().get::<Room>(&room_id)?.map(Json).ok_or_else(room_not_found)
}

pub(super) async fn create_room(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(body): JsonBody<RoomCreate>,
) -> AppResult<Json<Room>> {
    let room = body.into_room();
    state.store.0.lock().insert(&room)?;
    info!(target: "dormhub::rooms", "room {} ({}) created by {}", room.room_id, room.room_number, admin.user_id);
    Ok(Json(room))
}

pub(super) async fn update_room(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(room_id): Path<String>,
    JsonBody(update): JsonBody<RoomUpdate>,
) -> AppResult<Json<Room>> {
    let updated = state.store.0.lock().update::<Room>(&room_id, |r| update.apply(r))?;
    updated.map(Json).ok_or_else(room_not_found)
}
