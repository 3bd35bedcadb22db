use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::identity::ensure_owner_or_admin;
use crate::model::{SupportTicket, SupportTicketCreate, TicketResponse, TicketStatus};

use super::extract::{label, present, CurrentUser, JsonBody};
use super::maintenance::StatusFilter;
use super::{AppState, LIST_LIMIT};

#[derive(Debug, Deserialize)]
pub(super) struct RespondBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusBody {
    #[serde(default)]
    status: Option<String>,
}

fn ticket_not_found() -> AppError {
    AppError::not_found("ticket_not_found", "Ticket not found")
}

pub(super) async fn my_tickets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<StatusFilter>,
) -> AppResult<Json<Vec<SupportTicket>>> {
    let status = filter.status.filter(|s| !s.is_empty());
    let mut tickets = state.store.0.lock().find::<SupportTicket>(|t| {
        t.user_id == user.user_id && status.as_deref().map_or(true, |s| label(&t.status) == s)
    })?;
    tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tickets.truncate(LIST_LIMIT);
    Ok(Json(tickets))
}

/// Someone else's ticket reads as missing; admins see every ticket.
pub(super) async fn get_ticket(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ticket_id): Path<String>,
) -> AppResult<Json<SupportTicket>> {
    let ticket = state.store.0.lock().get::<SupportTicket>(&ticket_id)?;
    ticket
        .filter(|t| t.user_id == user.user_id || user.is_admin())
        .map(Json)
        .ok_or_else(ticket_not_found)
}

pub(super) async fn create_ticket(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(body): JsonBody<SupportTicketCreate>,
) -> AppResult<Json<SupportTicket>> {
    let ticket = body.into_ticket(&user.user_id);
    state.store.0.lock().insert(&ticket)?;
    info!(target: "dormhub::tickets", "ticket {} category={} by {}", ticket.ticket_id, label(&ticket.category), user.user_id);
    Ok(Json(ticket))
}

pub(super) async fn respond_to_ticket(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ticket_id): Path<String>,
    JsonBody(body): JsonBody<RespondBody>,
) -> AppResult<Json<SupportTicket>> {
    let Some(message) = present(body.message) else {
        return Err(AppError::user("missing_message", "message is required"));
    };
    let mut guard = state.store.0.lock();
    let Some(ticket) = guard.get::<SupportTicket>(&ticket_id)? else { return Err(ticket_not_found()) };
    ensure_owner_or_admin(&user, &ticket.user_id)?;
    let now = Utc::now();
    let response = TicketResponse {
        responder_id: user.user_id.clone(),
        responder_name: user.name.clone(),
        message,
        created_at: now,
    };
    let updated = guard.update::<SupportTicket>(&ticket_id, |t| {
        t.responses.push(response);
        t.updated_at = now;
    })?;
    updated.map(Json).ok_or_else(ticket_not_found)
}

/// Owners may move their ticket between open states; closing is for admins.
pub(super) async fn update_ticket_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(ticket_id): Path<String>,
    JsonBody(body): JsonBody<StatusBody>,
) -> AppResult<Json<SupportTicket>> {
    let Some(status) = body.status.as_deref().and_then(TicketStatus::parse) else {
        return Err(AppError::user("invalid_status", "Invalid status"));
    };
    let mut guard = state.store.0.lock();
    let Some(ticket) = guard.get::<SupportTicket>(&ticket_id)? else { return Err(ticket_not_found()) };
    ensure_owner_or_admin(&user, &ticket.user_id)?;
    if status == TicketStatus::Closed && !user.is_admin() {
        return Err(AppError::forbidden("admin_required", "Only an admin can close a ticket"));
    }
    let now = Utc::now();
    let updated = guard.update::<SupportTicket>(&ticket_id, |t| {
        t.status = status;
        t.updated_at = now;
    })?;
    updated.map(Json).ok_or_else(ticket_not_found)
}
