//!
//! dormhub server binary
//! ---------------------
//! Command-line entry point for the dormitory API. Configuration comes from
//! environment variables (and `.env`); a few CLI flags override them.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

fn parse_port_arg(args: &[String], flag: &str) -> Option<u16> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return args[i + 1].parse::<u16>().ok();
        }
        i += 1;
    }
    None
}

fn parse_value_arg(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).filter(|v| !v.starts_with('-')).cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let args: Vec<String> = env::args().collect();

    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("dormhub Server\n\nUSAGE:\n  dormhub_server [--http-port N] [--data-dir PATH] [--seed]\n\nOPTIONS:\n  --http-port N     HTTP API port (env: DORMHUB_HTTP_PORT, default 8001)\n  --data-dir PATH   Folder for collection files (env: DORMHUB_DATA_DIR; unset keeps data in memory)\n  --seed            Insert sample rooms, announcements and FAQs at startup (env: DORMHUB_SEED_ON_START)\n\nOther settings: DORMHUB_SESSION_TTL_DAYS, DORMHUB_SESSION_SWEEP_SECS, DORMHUB_COOKIE_SECURE,\nDORMHUB_SEED_ENDPOINT, DORMHUB_OAUTH_SESSION_URL, FIREBASE_PROJECT_ID, FIREBASE_ACCESS_TOKEN,\nFIREBASE_API_KEY, FIREBASE_BASE_URL.\n");
        return Ok(());
    }

    let mut config = dormhub::config::Config::from_env();

    // CLI arguments override environment
    if let Some(port) = parse_port_arg(&args, "--http-port") {
        config.http_port = port;
    }
    if let Some(dir) = parse_value_arg(&args, "--data-dir") {
        config.data_dir = Some(PathBuf::from(dir));
    }
    if has_flag(&args, "--seed") {
        config.seed_on_start = true;
    }

    tracing::info!(
        "dormhub starting using port http={}, data_dir={}",
        config.http_port,
        config.data_dir.as_ref().map(|d| d.display().to_string()).unwrap_or_else(|| "<memory>".to_string())
    );
    dormhub::server::run(config).await
}
