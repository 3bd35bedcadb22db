//! Runtime configuration for the API server and the chat relay.
//!
//! Values come from environment variables (a `.env` file is loaded first when
//! present); binaries may override a few of them with command-line flags.

use std::path::PathBuf;

const DEFAULT_HTTP_PORT: u16 = 8001;
const DEFAULT_CHAT_PORT: u16 = 8002;
const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
/// Longer lifetimes are refused; timestamp arithmetic overflows long before i64::MAX days.
const MAX_SESSION_TTL_DAYS: i64 = 3650;
const DEFAULT_SESSION_SWEEP_SECS: u64 = 300;
const DEFAULT_OAUTH_SESSION_URL: &str = "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data";
const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_CHAT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_CHAT_MAX_HISTORY: usize = 40;
const DEFAULT_CHAT_IDLE_SECS: u64 = 60 * 60;

#[derive(Clone, Debug)]
pub struct OAuthConfig {
    /// Endpoint answering `GET` with header `X-Session-ID`.
    pub session_data_url: String,
}

#[derive(Clone, Debug)]
pub struct FirebaseConfig {
    pub base_url: String,
    /// Needed for tenant lookups by email.
    pub project_id: Option<String>,
    /// OAuth2 bearer for the admin lookup API.
    pub access_token: Option<String>,
    /// Web API key for password sign-in and reset mails. Without it password
    /// checks are skipped.
    pub api_key: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub http_port: u16,
    /// None keeps every collection in memory only.
    pub data_dir: Option<PathBuf>,
    pub session_ttl_days: i64,
    pub session_sweep_secs: u64,
    pub cookie_secure: bool,
    pub seed_on_start: bool,
    pub seed_endpoint: bool,
    pub oauth: OAuthConfig,
    pub firebase: FirebaseConfig,
}

impl Default for Config {
    fn default() -> Self { Self::from_lookup(|_| None) }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            http_port: parse_num(&get, "DORMHUB_HTTP_PORT").unwrap_or(DEFAULT_HTTP_PORT),
            data_dir: non_empty(&get, "DORMHUB_DATA_DIR").map(PathBuf::from),
            session_ttl_days: parse_num(&get, "DORMHUB_SESSION_TTL_DAYS").filter(|d| (1..=MAX_SESSION_TTL_DAYS).contains(d)).unwrap_or(DEFAULT_SESSION_TTL_DAYS),
            session_sweep_secs: parse_num(&get, "DORMHUB_SESSION_SWEEP_SECS").unwrap_or(DEFAULT_SESSION_SWEEP_SECS),
            cookie_secure: parse_bool(&get, "DORMHUB_COOKIE_SECURE").unwrap_or(true),
            seed_on_start: parse_bool(&get, "DORMHUB_SEED_ON_START").unwrap_or(false),
            seed_endpoint: parse_bool(&get, "DORMHUB_SEED_ENDPOINT").unwrap_or(false),
            oauth: OAuthConfig {
                session_data_url: non_empty(&get, "DORMHUB_OAUTH_SESSION_URL").unwrap_or_else(|| DEFAULT_OAUTH_SESSION_URL.to_string()),
            },
            firebase: FirebaseConfig {
                base_url: non_empty(&get, "FIREBASE_BASE_URL").unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_string()),
                project_id: non_empty(&get, "FIREBASE_PROJECT_ID"),
                access_token: non_empty(&get, "FIREBASE_ACCESS_TOKEN"),
                api_key: non_empty(&get, "FIREBASE_API_KEY"),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub port: u16,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Turns kept per session (user + model messages).
    pub max_history: usize,
    /// Sessions untouched for this long are dropped. 0 disables the sweep.
    pub idle_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self { Self::from_lookup(|_| None) }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_num(&get, "CHAT_PORT").unwrap_or(DEFAULT_CHAT_PORT),
            api_key: non_empty(&get, "GOOGLE_AI_API_KEY"),
            model: non_empty(&get, "CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            base_url: non_empty(&get, "CHAT_BASE_URL").unwrap_or_else(|| DEFAULT_CHAT_BASE_URL.to_string()),
            max_history: parse_num(&get, "CHAT_MAX_HISTORY").filter(|n| *n > 0).unwrap_or(DEFAULT_CHAT_MAX_HISTORY),
            idle_timeout_secs: parse_num(&get, "CHAT_IDLE_TIMEOUT_SECS").unwrap_or(DEFAULT_CHAT_IDLE_SECS),
        }
    }
}

fn non_empty(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    get(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_num<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    non_empty(get, name).and_then(|v| v.parse::<T>().ok())
}

pub(crate) fn parse_bool_str(v: &str) -> Option<bool> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool(get: &impl Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    non_empty(get, name).and_then(|v| parse_bool_str(&v))
}
