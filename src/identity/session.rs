use anyhow::{anyhow, Result};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::model::{User, UserSession};
use crate::storage::SharedStore;

pub type SessionToken = String;

/// 256-bit random token, base64url without padding.
fn gen_token() -> Result<SessionToken> {
    let mut buf = [0u8; 32];
    getrandom::getrandom(&mut buf).map_err(|e| anyhow!("random source unavailable: {e}"))?;
    Ok(format!("session_{}", base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)))
}

/// Issues and validates login sessions stored in the `user_sessions` collection.
#[derive(Clone)]
pub struct SessionManager {
    store: SharedStore,
    pub ttl: Duration,
}

impl SessionManager {
    pub fn new(store: SharedStore, ttl: Duration) -> Self { Self { store, ttl } }

    /// Start a session for `user_id`, replacing any sessions the user already
    /// had. A token handed over by the OAuth provider is reused when given.
    pub fn issue(&self, user_id: &str, token: Option<SessionToken>) -> Result<UserSession> {
        self.issue_at(user_id, token, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, token: Option<SessionToken>, now: DateTime<Utc>) -> Result<UserSession> {
        let mut guard = self.store.0.lock();
        let dropped = guard.delete_where::<UserSession>(|s| s.user_id == user_id)?;
        // a provider token already held by someone else is never reused
        let token = match token.filter(|t| !t.trim().is_empty()) {
            Some(t) if guard.contains::<UserSession>(&t) => {
                warn!(target: "dormhub::session", "provider token already in use; minting a fresh one for user={}", user_id);
                gen_token()?
            }
            Some(t) => t,
            None => gen_token()?,
        };
        let session = UserSession {
            user_id: user_id.to_string(),
            session_token: token,
            expires_at: now + self.ttl,
            created_at: now,
        };
        guard.insert(&session)?;
        debug!(target: "dormhub::session", "session.issue user={} replaced={} ttl_days={}", user_id, dropped, self.ttl.num_days());
        Ok(session)
    }

    /// Look a token up; expired sessions are deleted on sight.
    pub fn validate(&self, token: &str) -> Result<Option<UserSession>> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Option<UserSession>> {
        let mut guard = self.store.0.lock();
        let Some(session) = guard.get::<UserSession>(token)? else { return Ok(None) };
        if session.is_live_at(now) {
            return Ok(Some(session));
        }
        guard.delete::<UserSession>(token)?;
        debug!(target: "dormhub::session", "session.expired user={}", session.user_id);
        Ok(None)
    }

    /// Resolve a token to its user. A session pointing at a deleted user counts as no session.
    pub fn resolve_user(&self, token: &str) -> Result<Option<User>> {
        let Some(session) = self.validate(token)? else { return Ok(None) };
        let guard = self.store.0.lock();
        guard.get::<User>(&session.user_id)
    }

    pub fn logout(&self, token: &str) -> Result<bool> {
        self.store.0.lock().delete::<UserSession>(token)
    }

    pub fn sweep_expired(&self) -> Result<usize> {
        let now = Utc::now();
        self.store.0.lock().delete_where::<UserSession>(|s| !s.is_live_at(now))
    }
}
