//! Retrieval worker binary.
//!
//! Reads chat messages one per line from stdin (standing in for the chat
//! transport), spawns one retrieval per message so the dispatch loop is
//! never blocked, and reports each outcome on stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bfetch_models::RetrievalOutcome;
use bfetch_worker::{BotConfig, Retriever};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("bfetch_worker=info".parse()?)
        .add_directive("bfetch_media=info".parse()?)
        .add_directive("bfetch_render=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting bfetch-worker");

    let config = BotConfig::from_env();
    info!("Worker config: {:?}", config);

    let retriever = Arc::new(Retriever::new(config));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let retriever = Arc::clone(&retriever);
                tokio::spawn(async move {
                    match retriever.retrieve(&line).await {
                        RetrievalOutcome::NotApplicable => {}
                        RetrievalOutcome::Success { message, artifact } => {
                            println!("ok: {} ({})", message, artifact.display());
                        }
                        RetrievalOutcome::Failure { message } => {
                            println!("failed: {}", message);
                        }
                    }
                });
            }
        }
    }

    info!("Worker shutdown complete");
    Ok(())
}
