//! Request extractors shared by the handlers: the caller's identity and a
//! JSON body whose rejections use the API error shape.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};
use crate::identity::require_admin;
use crate::model::User;

use super::{session_token_from_headers, AppState};

/// An authenticated caller. Rejects with 401 when no live session is presented.
pub struct CurrentUser(pub User);

/// An admin caller. Anonymous callers get the same 403 as residents, and the
/// check runs before the request body is parsed.
pub struct AdminUser(pub User);

fn resolve(parts: &Parts, state: &AppState) -> AppResult<Option<User>> {
    let Some(token) = session_token_from_headers(&parts.headers) else { return Ok(None) };
    Ok(state.sessions.resolve_user(&token)?)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state)?.map(CurrentUser).ok_or_else(AppError::not_authenticated)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        require_admin(resolve(parts, state)?).map(AdminUser)
    }
}

/// `Json<T>` whose parse failures answer 400 with the usual error body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(v)) => Ok(JsonBody(v)),
            Err(rej) => Err(json_rejection(rej)),
        }
    }
}

fn json_rejection(rej: JsonRejection) -> AppError {
    AppError::user("invalid_body".to_string(), rej.body_text())
}

/// Serialized name of a snake_case enum value, for comparing against query strings.
pub(crate) fn label<T: serde::Serialize>(v: &T) -> String {
    match serde_json::to_value(v) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Trimmed, non-empty text or None.
pub(crate) fn present(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
