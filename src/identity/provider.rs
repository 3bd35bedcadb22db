use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{FirebaseConfig, OAuthConfig};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity provider not configured: {0}")]
    NotConfigured(&'static str),

    #[error("identity provider answered {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Profile returned by the OAuth session-data handshake.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OAuthProfile {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    /// Some providers mint the session token themselves.
    #[serde(default)]
    pub session_token: Option<String>,
}

/// Exchanges a one-time OAuth `session_id` for the signed-in profile.
#[async_trait]
pub trait OAuthExchange: Send + Sync {
    /// `Ok(None)` when the provider does not recognise the id.
    async fn exchange(&self, session_id: &str) -> Result<Option<OAuthProfile>, ProviderError>;
}

pub struct HttpOAuthExchange {
    client: reqwest::Client,
    url: String,
}

impl HttpOAuthExchange {
    pub fn new(client: reqwest::Client, cfg: &OAuthConfig) -> Self {
        Self { client, url: cfg.session_data_url.clone() }
    }
}

#[async_trait]
impl OAuthExchange for HttpOAuthExchange {
    async fn exchange(&self, session_id: &str) -> Result<Option<OAuthProfile>, ProviderError> {
        let resp = self.client.get(&self.url).header("X-Session-ID", session_id).send().await?;
        if resp.status() != StatusCode::OK {
            debug!(target: "dormhub::oauth", status = resp.status().as_u16(), "session-data exchange refused");
            return Ok(None);
        }
        Ok(Some(resp.json::<OAuthProfile>().await?))
    }
}

/// A registered tenant as known by the identity directory.
#[derive(Debug, Clone, PartialEq)]
pub struct TenantRecord {
    pub firebase_id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Valid,
    /// No password API configured; the check was not performed.
    Skipped,
    Invalid,
    Disabled,
    TooManyAttempts,
}

/// The external directory of registered tenants.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn lookup_email(&self, email: &str) -> Result<Option<TenantRecord>, ProviderError>;
    async fn check_password(&self, email: &str, password: &str) -> Result<PasswordCheck, ProviderError>;
    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError>;
}

/// Maps an identity-toolkit sign-in error message to an outcome.
pub fn classify_sign_in_error(message: &str) -> PasswordCheck {
    if message.contains("USER_DISABLED") {
        PasswordCheck::Disabled
    } else if message.contains("TOO_MANY_ATTEMPTS") {
        PasswordCheck::TooManyAttempts
    } else {
        // INVALID_PASSWORD, INVALID_LOGIN_CREDENTIALS, EMAIL_NOT_FOUND and anything unknown
        PasswordCheck::Invalid
    }
}

pub(crate) fn display_name_or_local_part(name: Option<String>, email: &str) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

/// Firebase Authentication through the identity toolkit REST API.
pub struct FirebaseDirectory {
    client: reqwest::Client,
    cfg: FirebaseConfig,
}

impl FirebaseDirectory {
    pub fn new(client: reqwest::Client, cfg: FirebaseConfig) -> Self { Self { client, cfg } }

    fn base(&self) -> &str { self.cfg.base_url.trim_end_matches('/') }
}

#[async_trait]
impl TenantDirectory for FirebaseDirectory {
    async fn lookup_email(&self, email: &str) -> Result<Option<TenantRecord>, ProviderError> {
        let project = self.cfg.project_id.as_deref().ok_or(ProviderError::NotConfigured("FIREBASE_PROJECT_ID"))?;
        let token = self.cfg.access_token.as_deref().ok_or(ProviderError::NotConfigured("FIREBASE_ACCESS_TOKEN"))?;
        let url = format!("{}/v1/projects/{}/accounts:lookup", self.base(), project);
        let resp = self.client.post(url).bearer_auth(token).json(&json!({ "email": [email] })).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected { status, body });
        }
        let parsed: LookupResponse = resp.json().await?;
        let Some(u) = parsed.users.into_iter().next() else {
            info!(target: "dormhub::tenant", "user not found in directory: {}", email);
            return Ok(None);
        };
        let email = u.email.unwrap_or_else(|| email.to_string());
        Ok(Some(TenantRecord {
            firebase_id: u.local_id,
            name: display_name_or_local_part(u.display_name, &email),
            email,
            phone: u.phone_number,
            picture: u.photo_url,
            email_verified: u.email_verified,
        }))
    }

    async fn check_password(&self, email: &str, password: &str) -> Result<PasswordCheck, ProviderError> {
        let Some(key) = self.cfg.api_key.as_deref() else { return Ok(PasswordCheck::Skipped) };
        let url = format!("{}/v1/accounts:signInWithPassword", self.base());
        let resp = self.client
            .post(url)
            .query(&[("key", key)])
            .json(&json!({ "email": email, "password": password, "returnSecureToken": true }))
            .send()
            .await?;
        if resp.status().is_success() {
            return Ok(PasswordCheck::Valid);
        }
        let body: serde_json::Value = resp.json().await.unwrap_or_default();
        let message = body.pointer("/error/message").and_then(|m| m.as_str()).unwrap_or("INVALID_CREDENTIALS");
        Ok(classify_sign_in_error(message))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        let key = self.cfg.api_key.as_deref().ok_or(ProviderError::NotConfigured("FIREBASE_API_KEY"))?;
        let url = format!("{}/v1/accounts:sendOobCode", self.base());
        let resp = self.client
            .post(url)
            .query(&[("key", key)])
            .json(&json!({ "requestType": "PASSWORD_RESET", "email": email }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected { status, body });
        }
        Ok(())
    }
}
