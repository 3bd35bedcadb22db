use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

/// Persisted login session, keyed by its token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    pub session_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserSession {
    /// Valid only while the expiry is strictly in the future.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool { self.expires_at > now }
}

impl Document for UserSession {
    const COLLECTION: &'static str = "user_sessions";
    fn id(&self) -> &str { &self.session_token }
}
