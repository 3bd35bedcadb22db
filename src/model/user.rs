use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Resident,
    Admin,
    Staff,
}

/// A tenant (or staff/admin) account. Created on first verified login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub firebase_tenant_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    fn id(&self) -> &str { &self.user_id }
}

/// Self-service profile edit; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub picture: Option<String>,
}

impl UserUpdate {
    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.name { user.name = v; }
        if let Some(v) = self.phone { user.phone = Some(v); }
        if let Some(v) = self.address { user.address = Some(v); }
        if let Some(v) = self.picture { user.picture = Some(v); }
    }
}
