//! HTTP surface of the chat relay: `/api/chatbot/{message,health,reset}`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ChatConfig;

use super::llm::GeminiClient;
use super::prompt::{FALLBACK_RESPONSE, SYSTEM_PROMPT};
use super::relay::ChatRelay;

#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetBody {
    #[serde(default)]
    session_id: Option<String>,
}

fn bad_request(msg: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
}

async fn chat_message(
    State(relay): State<Arc<ChatRelay>>,
    payload: Result<Json<MessageBody>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Ok(Json(body)) = payload else { return bad_request("Message is required") };
    let Some(message) = body.message.filter(|m| !m.trim().is_empty()) else {
        return bad_request("Message is required");
    };
    let session_id = body
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    match relay.send(&session_id, &message).await {
        Ok(response) => (StatusCode::OK, Json(json!({ "response": response, "session_id": session_id }))),
        Err(e) => {
            error!(target: "dormhub::chat", "chat turn failed for session {}: {}", session_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "response": FALLBACK_RESPONSE, "error": e.to_string() })),
            )
        }
    }
}

async fn chat_health(State(relay): State<Arc<ChatRelay>>) -> Json<Value> {
    Json(json!({ "status": "ok", "model": relay.model_name() }))
}

async fn chat_reset(
    State(relay): State<Arc<ChatRelay>>,
    payload: Result<Json<ResetBody>, JsonRejection>,
) -> Json<Value> {
    let session_id = payload.ok().and_then(|Json(b)| b.session_id);
    if let Some(id) = session_id {
        relay.reset(&id);
    }
    Json(json!({ "message": "Session reset successfully" }))
}

pub fn build_chat_router(relay: Arc<ChatRelay>) -> Router {
    Router::new()
        .route("/api/chatbot/message", post(chat_message))
        .route("/api/chatbot/health", get(chat_health))
        .route("/api/chatbot/reset", post(chat_reset))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Serve the chat relay until Ctrl-C.
pub async fn run_chat(config: ChatConfig) -> anyhow::Result<()> {
    info!(
        target: "startup",
        "chat relay starting. port={}, model={}, max_history={}, idle_timeout_secs={}",
        config.port, config.model, config.max_history, config.idle_timeout_secs
    );
    if config.api_key.is_none() {
        warn!(target: "startup", "GOOGLE_AI_API_KEY unset; every chat turn will answer with the fallback message");
    }
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .context("While building HTTP client")?;
    let model = Arc::new(GeminiClient::new(http, &config));
    let relay = Arc::new(ChatRelay::new(model, SYSTEM_PROMPT, config.max_history));

    if config.idle_timeout_secs > 0 {
        let relay = relay.clone();
        let max_idle = Duration::from_secs(config.idle_timeout_secs);
        tokio::spawn(async move {
            let period = (max_idle / 4).max(Duration::from_secs(30));
            loop {
                tokio::time::sleep(period).await;
                let removed = relay.sweep_idle(max_idle);
                if removed > 0 {
                    tracing::debug!(removed = removed, remaining = relay.session_count(), "chat_session_sweep");
                }
            }
        });
    }

    let app = build_chat_router(relay);
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Starting chat relay on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(crate::server::shutdown_signal()).await?;
    Ok(())
}
