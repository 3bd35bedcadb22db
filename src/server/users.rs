use axum::extract::State;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::model::{User, UserUpdate};

use super::extract::{CurrentUser, JsonBody};
use super::AppState;

pub(super) async fn get_me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Only the fields present in the body change.
pub(super) async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(update): JsonBody<UserUpdate>,
) -> AppResult<Json<User>> {
    let updated = state.store.0.lock().update::<User>(&user.user_id, |u| update.apply(u))?;
    updated.map(Json).ok_or_else(AppError::not_authenticated)
}
