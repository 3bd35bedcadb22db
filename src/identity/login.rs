//! The shared tail of every login path: verified tenant in, user record
//! upserted, fresh session out.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::model::{new_id, Role, User, UserSession};
use crate::storage::SharedStore;

use super::provider::{OAuthProfile, TenantDirectory, TenantRecord};
use super::session::SessionManager;

pub const NOT_A_TENANT: &str =
    "Access denied. Your account is not registered as an active tenant. Please contact the dormitory administrator.";

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub session: UserSession,
}

/// Directory lookup that treats provider failures like an unknown email.
pub async fn verify_tenant(directory: &dyn TenantDirectory, email: &str) -> Option<TenantRecord> {
    match directory.lookup_email(email).await {
        Ok(found) => found,
        Err(e) => {
            error!(target: "dormhub::tenant", "tenant verification error for {}: {}", email, e);
            None
        }
    }
}

/// Create the user on first login or refresh the existing record by email.
pub fn upsert_tenant_user(
    store: &SharedStore,
    email: &str,
    tenant: &TenantRecord,
    profile: Option<&OAuthProfile>,
    now: DateTime<Utc>,
) -> Result<User> {
    let profile_name = profile.and_then(|p| p.name.clone()).filter(|n| !n.trim().is_empty());
    let profile_picture = profile.and_then(|p| p.picture.clone());
    let mut guard = store.0.lock();
    if let Some(existing) = guard.find_one::<User>(|u| u.email.eq_ignore_ascii_case(email))? {
        let updated = guard.update::<User>(&existing.user_id, |u| {
            if let Some(n) = profile_name { u.name = n; }
            if let Some(p) = profile_picture { u.picture = Some(p); }
            u.firebase_tenant_id = Some(tenant.firebase_id.clone());
            u.last_login = Some(now);
        })?;
        return Ok(updated.unwrap_or(existing));
    }
    let name = Some(tenant.name.clone())
        .filter(|n| !n.trim().is_empty())
        .or(profile_name)
        .unwrap_or_else(|| "Tenant".to_string());
    let user = User {
        user_id: new_id("user"),
        email: email.to_string(),
        name,
        picture: profile_picture.or_else(|| tenant.picture.clone()),
        phone: tenant.phone.clone(),
        address: None,
        role: Role::Resident,
        firebase_tenant_id: Some(tenant.firebase_id.clone()),
        created_at: now,
        last_login: Some(now),
    };
    guard.insert(&user)?;
    info!(target: "dormhub::auth", "created user {} for {}", user.user_id, email);
    Ok(user)
}

pub fn complete_login(
    store: &SharedStore,
    sessions: &SessionManager,
    email: &str,
    tenant: &TenantRecord,
    profile: Option<&OAuthProfile>,
) -> Result<LoginOutcome> {
    let user = upsert_tenant_user(store, email, tenant, profile, Utc::now())?;
    let session = sessions.issue(&user.user_id, profile.and_then(|p| p.session_token.clone()))?;
    info!(target: "dormhub::auth", "user {} logged in", email);
    Ok(LoginOutcome { user, session })
}
