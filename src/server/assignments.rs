use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::model::{AssignmentStatus, Room, RoomAssignment, RoomAssignmentCreate, RoomStatus, User};

use super::extract::{AdminUser, CurrentUser, JsonBody};
use super::AppState;

/// The caller's active assignment with its room embedded, or `null`.
pub(super) async fn my_assignment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Value>> {
    let guard = state.store.0.lock();
    let found = guard.find_one::<RoomAssignment>(|a| a.user_id == user.user_id && a.status == AssignmentStatus::Active)?;
    let Some(assignment) = found else { return Ok(Json(Value::Null)) };
    let room = guard.get::<Room>(&assignment.room_id)?;
    let mut out = json!(assignment);
    out["room"] = json!(room);
    Ok(Json(out))
}

/// Assign a resident to an available room; the room becomes occupied.
pub(super) async fn create_assignment(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(body): JsonBody<RoomAssignmentCreate>,
) -> AppResult<Json<RoomAssignment>> {
    let mut guard = state.store.0.lock();
    let Some(room) = guard.get::<Room>(&body.room_id)? else {
        return Err(AppError::not_found("room_not_found", "Room not found"));
    };
    if room.status != RoomStatus::Available {
        return Err(AppError::user("room_unavailable", "Room is not available"));
    }
    if !guard.contains::<User>(&body.user_id) {
        return Err(AppError::not_found("user_not_found", "User not found"));
    }
    let assignment = body.into_assignment();
    guard.insert(&assignment)?;
    // the assignment only stands if its room is marked occupied too
    if let Err(e) = guard.update::<Room>(&room.room_id, |r| r.status = RoomStatus::Occupied) {
        if let Err(undo) = guard.delete::<RoomAssignment>(&assignment.assignment_id) {
            error!(target: "dormhub::assignments", "rollback of {} failed: {}", assignment.assignment_id, undo);
        }
        return Err(e.into());
    }
    info!(
        target: "dormhub::assignments",
        "assignment {} user={} room={} by {}", assignment.assignment_id, assignment.user_id, room.room_id, admin.user_id
    );
    Ok(Json(assignment))
}
