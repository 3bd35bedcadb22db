use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::identity::{complete_login, verify_tenant, LoginOutcome, PasswordCheck, NOT_A_TENANT};

use super::extract::{present, CurrentUser, JsonBody};
use super::{clear_session_cookie, session_token_from_headers, set_session_cookie, AppState};

const RESET_NOTICE: &str = "If this email is registered, a password reset link has been sent.";

#[derive(Debug, Deserialize)]
pub(super) struct SessionBody {
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginBody {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ForgotPasswordBody {
    #[serde(default)]
    email: Option<String>,
}

fn not_a_tenant() -> AppError {
    AppError::forbidden("not_a_tenant", NOT_A_TENANT)
}

/// `{user, session_token}` plus the session cookie.
fn login_response(state: &AppState, outcome: LoginOutcome) -> (HeaderMap, Json<Value>) {
    let mut headers = HeaderMap::new();
    let max_age = state.sessions.ttl.num_seconds();
    if let Some(v) = set_session_cookie(&outcome.session.session_token, max_age, state.config.cookie_secure) {
        headers.insert(header::SET_COOKIE, v);
    }
    (headers, Json(json!({ "user": outcome.user, "session_token": outcome.session.session_token })))
}

/// Exchange a one-time OAuth `session_id` for a dormhub session.
pub(super) async fn create_session(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SessionBody>,
) -> AppResult<(HeaderMap, Json<Value>)> {
    let Some(session_id) = present(body.session_id) else {
        return Err(AppError::user("missing_session_id", "session_id is required"));
    };
    let profile = match state.oauth.exchange(&session_id).await {
        Ok(Some(p)) => p,
        Ok(None) => return Err(AppError::auth("invalid_session_id", "Invalid session_id")),
        Err(e) => {
            error!(target: "dormhub::auth", "oauth exchange failed: {}", e);
            return Err(AppError::upstream("oauth_unavailable", "Authentication provider unavailable"));
        }
    };
    let email = profile.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::auth("invalid_session_id", "Invalid session_id"));
    }
    let Some(tenant) = verify_tenant(state.directory.as_ref(), &email).await else {
        warn!(target: "dormhub::auth", "oauth login refused for non-tenant {}", email);
        return Err(not_a_tenant());
    };
    let outcome = complete_login(&state.store, &state.sessions, &email, &tenant, Some(&profile))?;
    Ok(login_response(&state, outcome))
}

/// Email/password login checked against the tenant directory.
pub(super) async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> AppResult<(HeaderMap, Json<Value>)> {
    let (Some(email), Some(password)) = (present(body.email), body.password.filter(|p| !p.is_empty())) else {
        return Err(AppError::user("missing_credentials", "Email and password are required"));
    };
    let Some(tenant) = verify_tenant(state.directory.as_ref(), &email).await else {
        warn!(target: "dormhub::auth", "password login refused for non-tenant {}", email);
        return Err(not_a_tenant());
    };
    let check = state.directory.check_password(&email, &password).await.map_err(|e| {
        error!(target: "dormhub::auth", "password check failed for {}: {}", email, e);
        AppError::upstream("directory_unavailable", "Authentication provider unavailable")
    })?;
    match check {
        PasswordCheck::Valid => {}
        PasswordCheck::Skipped => warn!(target: "dormhub::auth", "password check skipped for {}; no directory API key", email),
        PasswordCheck::Invalid => return Err(AppError::auth("invalid_credentials", "Invalid email or password")),
        PasswordCheck::Disabled => return Err(AppError::forbidden("account_disabled", "This account has been disabled")),
        PasswordCheck::TooManyAttempts => {
            return Err(AppError::rate_limited("too_many_attempts", "Too many failed attempts. Please try again later."))
        }
    }
    let outcome = complete_login(&state.store, &state.sessions, &email, &tenant, None)?;
    Ok(login_response(&state, outcome))
}

/// Always answers the same notice so callers cannot probe which emails exist.
pub(super) async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ForgotPasswordBody>,
) -> AppResult<Json<Value>> {
    let Some(email) = present(body.email) else {
        return Err(AppError::user("missing_email", "Email is required"));
    };
    if verify_tenant(state.directory.as_ref(), &email).await.is_some() {
        match state.directory.send_password_reset(&email).await {
            Ok(()) => info!(target: "dormhub::auth", "password reset sent to {}", email),
            Err(e) => error!(target: "dormhub::auth", "password reset for {} failed: {}", email, e),
        }
    }
    Ok(Json(json!({ "message": RESET_NOTICE })))
}

pub(super) async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!(user))
}

pub(super) async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<(HeaderMap, Json<Value>)> {
    if let Some(token) = session_token_from_headers(&headers) {
        state.sessions.logout(&token)?;
    }
    let mut out = HeaderMap::new();
    out.insert(header::SET_COOKIE, clear_session_cookie());
    Ok((out, Json(json!({ "message": "Logged out successfully" }))))
}
