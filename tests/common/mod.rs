#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

use dormhub::config::Config;
use dormhub::identity::{OAuthExchange, OAuthProfile, PasswordCheck, ProviderError, TenantDirectory, TenantRecord};
use dormhub::model::{Role, User};
use dormhub::server::{build_router, AppState};
use dormhub::storage::SharedStore;

fn unavailable() -> ProviderError {
    ProviderError::Rejected { status: 503, body: "unavailable".to_string() }
}

#[derive(Default)]
pub struct FakeOAuth {
    pub profiles: Mutex<HashMap<String, OAuthProfile>>,
    /// Every exchange fails like an unreachable provider.
    pub down: AtomicBool,
}

#[async_trait]
impl OAuthExchange for FakeOAuth {
    async fn exchange(&self, session_id: &str) -> Result<Option<OAuthProfile>, ProviderError> {
        if self.down.load(Ordering::SeqCst) { return Err(unavailable()); }
        Ok(self.profiles.lock().get(session_id).cloned())
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    pub tenants: Mutex<HashMap<String, TenantRecord>>,
    pub passwords: Mutex<HashMap<String, PasswordCheck>>,
    pub resets_sent: Mutex<Vec<String>>,
    pub lookup_down: AtomicBool,
    pub password_down: AtomicBool,
    pub reset_down: AtomicBool,
}

impl FakeDirectory {
    pub fn add_tenant(&self, email: &str, name: &str) {
        self.tenants.lock().insert(
            email.to_string(),
            TenantRecord {
                firebase_id: format!("fb_{}", name.to_lowercase().replace(' ', "_")),
                email: email.to_string(),
                name: name.to_string(),
                phone: Some("+63 917 000 0000".to_string()),
                picture: None,
                email_verified: true,
            },
        );
    }

    /// Outcome of checking `password` for `email`; unknown pairs are invalid.
    pub fn set_password(&self, email: &str, password: &str, outcome: PasswordCheck) {
        self.passwords.lock().insert(format!("{email}:{password}"), outcome);
    }
}

#[async_trait]
impl TenantDirectory for FakeDirectory {
    async fn lookup_email(&self, email: &str) -> Result<Option<TenantRecord>, ProviderError> {
        if self.lookup_down.load(Ordering::SeqCst) { return Err(unavailable()); }
        Ok(self.tenants.lock().get(email).cloned())
    }

    async fn check_password(&self, email: &str, password: &str) -> Result<PasswordCheck, ProviderError> {
        if self.password_down.load(Ordering::SeqCst) { return Err(unavailable()); }
        Ok(self.passwords.lock().get(&format!("{email}:{password}")).copied().unwrap_or(PasswordCheck::Invalid))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        if self.reset_down.load(Ordering::SeqCst) { return Err(unavailable()); }
        self.resets_sent.lock().push(email.to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub oauth: Arc<FakeOAuth>,
    pub directory: Arc<FakeDirectory>,
}

pub fn test_app() -> TestApp {
    test_app_with(Config::default(), SharedStore::in_memory())
}

pub fn test_app_with(config: Config, store: SharedStore) -> TestApp {
    let oauth = Arc::new(FakeOAuth::default());
    let directory = Arc::new(FakeDirectory::default());
    let state = AppState::new(store, config, oauth.clone(), directory.clone());
    TestApp { router: build_router(state.clone()), state, oauth, directory }
}

impl TestApp {
    /// Insert a user directly and return a live session token for it.
    pub fn user_with_session(&self, id: &str, role: Role) -> String {
        let user = User {
            user_id: id.to_string(),
            email: format!("{id}@dorm.test"),
            name: format!("User {id}"),
            picture: None,
            phone: None,
            address: None,
            role,
            firebase_tenant_id: None,
            created_at: Utc::now(),
            last_login: None,
        };
        self.state.store.0.lock().insert(&user).unwrap();
        self.state.sessions.issue(id, None).unwrap().session_token
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, body) = self.call_full(method, uri, token, body).await;
        (status, body)
    }

    pub async fn call_full(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => builder.header("content-type", "application/json").body(Body::from(b.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send(&self.router, req).await
    }
}

pub async fn send(router: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, headers, body)
}
