use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::model::{AssignmentStatus, Billing, MaintenanceRequest, Room, RoomAssignment, SupportTicket, User};

use super::billing::next_pending_bill;
use super::extract::CurrentUser;
use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct Dashboard {
    user: User,
    assignment: Option<RoomAssignment>,
    room: Option<Room>,
    latest_bill: Option<Billing>,
    active_maintenance_count: usize,
    open_tickets_count: usize,
}

/// One-shot summary for the resident home screen.
pub(super) async fn my_dashboard(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> AppResult<Json<Dashboard>> {
    let guard = state.store.0.lock();
    let uid = user.user_id.as_str();
    let assignment = guard.find_one::<RoomAssignment>(|a| a.user_id == uid && a.status == AssignmentStatus::Active)?;
    let room = match &assignment {
        Some(a) => guard.get::<Room>(&a.room_id)?,
        None => None,
    };
    let latest_bill = next_pending_bill(&guard, uid)?;
    let active_maintenance_count = guard.count::<MaintenanceRequest>(|r| r.user_id == uid && r.status.is_active())?;
    let open_tickets_count = guard.count::<SupportTicket>(|t| t.user_id == uid && t.status.is_open())?;
    drop(guard);
    Ok(Json(Dashboard { user, assignment, room, latest_bill, active_maintenance_count, open_tickets_count }))
}
