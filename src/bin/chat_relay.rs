//! Chat relay service: `/api/chatbot/*` in front of the language model.

use anyhow::Result;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("dormhub chat relay\n\nUSAGE:\n  chat_relay [--port N]\n\nOPTIONS:\n  --port N   Listen port (env: CHAT_PORT, default 8002)\n\nEnv: GOOGLE_AI_API_KEY, CHAT_MODEL, CHAT_BASE_URL, CHAT_MAX_HISTORY, CHAT_IDLE_TIMEOUT_SECS\n");
        return Ok(());
    }

    let mut config = dormhub::config::ChatConfig::from_env();
    if let Some(pos) = args.iter().position(|a| a == "--port") {
        if let Some(port) = args.get(pos + 1).and_then(|v| v.parse::<u16>().ok()) {
            config.port = port;
        }
    }
    dormhub::chat::run_chat(config).await
}
