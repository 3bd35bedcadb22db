//!
//! dormhub HTTP server
//! -------------------
//! This module defines the Axum-based JSON API served under `/api`.
//!
//! Responsibilities:
//! - Session management with a `session_token` cookie (or Bearer header).
//! - Login endpoints backed by the OAuth exchange and the tenant directory.
//! - Resource routes for rooms, assignments, billing, maintenance,
//!   announcements, FAQs, support tickets and the resident dashboard.
//! - Optional development seeding and a periodic sweep of expired sessions.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderMap, HeaderValue};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::identity::{FirebaseDirectory, HttpOAuthExchange, OAuthExchange, SessionManager, TenantDirectory};
use crate::storage::SharedStore;

pub mod extract;
mod health;
mod auth;
mod users;
mod rooms;
mod assignments;
mod billing;
mod maintenance;
mod announcements;
mod faqs;
mod tickets;
mod dashboard;
mod seed;

pub const SESSION_COOKIE: &str = "session_token";

/// Upper bound on list endpoints.
pub(crate) const LIST_LIMIT: usize = 100;

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub sessions: SessionManager,
    pub oauth: Arc<dyn OAuthExchange>,
    pub directory: Arc<dyn TenantDirectory>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: SharedStore,
        config: Config,
        oauth: Arc<dyn OAuthExchange>,
        directory: Arc<dyn TenantDirectory>,
    ) -> Self {
        let sessions = SessionManager::new(store.clone(), chrono::Duration::days(config.session_ttl_days));
        Self { store, sessions, oauth, directory, config: Arc::new(config) }
    }
}

/// Every route of the API, mounted under `/api`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/auth/session", post(auth::create_session))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/{room_id}", get(rooms::get_room).put(rooms::update_room))
        .route("/assignments", post(assignments::create_assignment))
        .route("/assignments/me", get(assignments::my_assignment))
        .route("/billing", post(billing::create_billing))
        .route("/billing/me", get(billing::my_bills))
        .route("/billing/me/latest", get(billing::my_latest_bill))
        .route("/billing/{billing_id}", put(billing::update_billing))
        .route("/maintenance", post(maintenance::create_request))
        .route("/maintenance/me", get(maintenance::my_requests))
        .route("/maintenance/{request_id}", put(maintenance::update_request))
        .route("/announcements", get(announcements::list_announcements).post(announcements::create_announcement))
        .route("/faqs", get(faqs::list_faqs).post(faqs::create_faq))
        .route("/faqs/categories", get(faqs::faq_categories))
        .route("/tickets", post(tickets::create_ticket))
        .route("/tickets/me", get(tickets::my_tickets))
        .route("/tickets/{ticket_id}", get(tickets::get_ticket))
        .route("/tickets/{ticket_id}/respond", post(tickets::respond_to_ticket))
        .route("/tickets/{ticket_id}/status", put(tickets::update_ticket_status))
        .route("/dashboard/me", get(dashboard::my_dashboard))
        .route("/seed", post(seed::seed_data));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn log_startup(config: &Config) {
    let cwd = std::env::current_dir().ok();
    info!(
        target: "startup",
        "dormhub starting. cwd={:?}, data_dir={:?}, http_port={}, session_ttl_days={}, seed_on_start={}, seed_endpoint={}",
        cwd, config.data_dir, config.http_port, config.session_ttl_days, config.seed_on_start, config.seed_endpoint
    );
    if config.firebase.project_id.is_none() || config.firebase.access_token.is_none() {
        warn!(target: "startup", "tenant directory is not fully configured; every login will be refused");
    }
    if config.firebase.api_key.is_none() {
        warn!(target: "startup", "FIREBASE_API_KEY unset; password checks are skipped and reset mails are not sent");
    }
}

/// Start the dormhub HTTP server with the given configuration.
///
/// Opens the document store (in memory when no data folder is configured),
/// optionally seeds sample data, starts the expired-session sweeper and
/// serves the API until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    log_startup(&config);

    let store = match &config.data_dir {
        Some(dir) => SharedStore::open(dir)
            .with_context(|| format!("While opening document store under {}", dir.display()))?,
        None => {
            warn!(target: "startup", "no data folder configured; documents live in memory only");
            SharedStore::in_memory()
        }
    };

    if config.seed_on_start {
        let inserted = crate::seed::seed_all(&store).context("While seeding sample data")?;
        info!(target: "startup", "seeded {} sample documents", inserted);
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .context("While building HTTP client")?;
    let oauth = Arc::new(HttpOAuthExchange::new(http.clone(), &config.oauth));
    let directory = Arc::new(FirebaseDirectory::new(http, config.firebase.clone()));
    let port = config.http_port;
    let sweep_secs = config.session_sweep_secs;
    let state = AppState::new(store, config, oauth, directory);

    // Background expired-session sweeper; 0 disables it
    if sweep_secs > 0 {
        let sessions = state.sessions.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(sweep_secs)).await;
                match sessions.sweep_expired() {
                    Ok(removed) if removed > 0 => tracing::debug!(removed = removed, "session_sweep"),
                    Ok(_) => {}
                    Err(e) => warn!("session sweep failed: {e}"),
                }
            }
        });
    }

    let app = build_router(state);
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

pub(crate) fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie")?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some((k, v)) = p.split_once('=') {
            if k == name && !v.is_empty() { return Some(v.to_string()); }
        }
    }
    None
}

/// Session token from the cookie, falling back to `Authorization: Bearer`.
pub(crate) fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(t) = parse_cookie(headers, SESSION_COOKIE) { return Some(t); }
    let auth = headers.get("authorization")?.to_str().ok()?;
    auth.strip_prefix("Bearer ").map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

pub(crate) fn set_session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Option<HeaderValue> {
    // SameSite=None is only honoured on Secure cookies
    let attrs = if secure { "HttpOnly; Secure; SameSite=None" } else { "HttpOnly; SameSite=Lax" };
    HeaderValue::from_str(&format!("{}={}; {}; Path=/; Max-Age={}", SESSION_COOKIE, token, attrs, max_age_secs)).ok()
}

pub(crate) fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("session_token=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; HttpOnly; Path=/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_takes_precedence_over_bearer() {
        let mut h = HeaderMap::new();
        h.insert("cookie", HeaderValue::from_static("theme=dark; session_token=abc"));
        h.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token_from_headers(&h).as_deref(), Some("abc"));
    }

    #[test]
    fn bearer_used_without_cookie() {
        let mut h = HeaderMap::new();
        h.insert("authorization", HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token_from_headers(&h).as_deref(), Some("xyz"));
        let mut h = HeaderMap::new();
        h.insert("authorization", HeaderValue::from_static("Basic Zm9v"));
        assert!(session_token_from_headers(&h).is_none());
    }

    #[test]
    fn session_cookie_attributes() {
        let v = set_session_cookie("tok", 604800, true).unwrap();
        let s = v.to_str().unwrap();
        assert!(s.starts_with("session_token=tok;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Secure"));
        assert!(s.contains("SameSite=None"));
        assert!(s.contains("Max-Age=604800"));
        let dev = set_session_cookie("tok", 60, false).unwrap();
        assert!(!dev.to_str().unwrap().contains("Secure"));
    }
}
