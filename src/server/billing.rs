use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::identity::ensure_owner_or_admin;
use crate::model::{Billing, BillingCreate, BillingStatus, BillingUpdate};
use crate::storage::Store;

use super::extract::{AdminUser, CurrentUser, JsonBody};
use super::{AppState, LIST_LIMIT};

/// Earliest-due pending bill of a user.
pub(crate) fn next_pending_bill(store: &Store, user_id: &str) -> anyhow::Result<Option<Billing>> {
    let pending = store.find::<Billing>(|b| b.user_id == user_id && b.status == BillingStatus::Pending)?;
    Ok(pending.into_iter().min_by_key(|b| b.due_date))
}

pub(super) async fn my_bills(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> AppResult<Json<Vec<Billing>>> {
    let mut bills = state.store.0.lock().find::<Billing>(|b| b.user_id == user.user_id)?;
    bills.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    bills.truncate(LIST_LIMIT);
    Ok(Json(bills))
}

pub(super) async fn my_latest_bill(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> AppResult<Json<Value>> {
    let bill = next_pending_bill(&state.store.0.lock(), &user.user_id)?;
    Ok(Json(json!(bill)))
}

pub(super) async fn create_billing(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(body): JsonBody<BillingCreate>,
) -> AppResult<Json<Billing>> {
    if !body.amount.is_finite() || body.amount < 0.0 {
        return Err(AppError::user("invalid_amount", "Amount must be a non-negative number"));
    }
    let bill = body.into_billing();
    state.store.0.lock().insert(&bill)?;
    info!(target: "dormhub::billing", "bill {} for user={} amount={} by {}", bill.billing_id, bill.user_id, bill.amount, admin.user_id);
    Ok(Json(bill))
}

/// Record a payment or status change on one bill.
pub(super) async fn update_billing(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(billing_id): Path<String>,
    JsonBody(update): JsonBody<BillingUpdate>,
) -> AppResult<Json<Billing>> {
    let mut guard = state.store.0.lock();
    let Some(bill) = guard.get::<Billing>(&billing_id)? else {
        return Err(AppError::not_found("bill_not_found", "Billing not found"));
    };
    ensure_owner_or_admin(&user, &bill.user_id)?;
    let now = Utc::now();
    let updated = guard.update::<Billing>(&billing_id, |b| update.apply(b, now))?;
    Ok(Json(updated.unwrap_or(bill)))
}
