//! Language-model seam for the chat relay and its Gemini implementation.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::ChatConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Model,
}

impl Speaker {
    fn role(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self { Self { speaker: Speaker::User, text: text.into() } }
    pub fn model(text: impl Into<String>) -> Self { Self { speaker: Speaker::Model, text: text.into() } }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model not configured: {0} is unset")]
    NotConfigured(&'static str),

    #[error("model answered {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("model returned no text")]
    EmptyReply,
}

/// Produces the next model turn for a conversation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;

    /// `turns` ends with the user message being answered.
    async fn reply(&self, system_prompt: &str, turns: &[ChatTurn]) -> Result<String, ChatError>;
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

fn first_candidate_text(resp: GenerateResponse) -> Option<String> {
    let content = resp.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Google Generative Language `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, cfg: &ChatConfig) -> Self {
        Self {
            client,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn name(&self) -> &str { &self.model }

    async fn reply(&self, system_prompt: &str, turns: &[ChatTurn]) -> Result<String, ChatError> {
        let key = self.api_key.as_deref().ok_or(ChatError::NotConfigured("GOOGLE_AI_API_KEY"))?;
        let contents: Vec<_> = turns
            .iter()
            .map(|t| json!({ "role": t.speaker.role(), "parts": [{ "text": t.text }] }))
            .collect();
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": contents,
        });
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let resp = self.client.post(url).header("x-goog-api-key", key).json(&body).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ChatError::Rejected { status, body });
        }
        let parsed: GenerateResponse = resp.json().await?;
        debug!(target: "dormhub::chat", model = %self.model, turns = turns.len(), "generateContent ok");
        first_candidate_text(parsed).ok_or(ChatError::EmptyReply)
    }
}
