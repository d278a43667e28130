mod bot;
mod commands;
mod config;
mod dedup;
mod firewall;
mod slack;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::Bot;
use crate::config::Config;
use crate::firewall::DigitalOceanClient;
use crate::slack::SlackClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,firegate=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut args = std::env::args().skip(1).peekable();
    let list_databases = args.peek().map(String::as_str) == Some("list-databases");
    if list_databases {
        args.next();
    }

    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Channel: {}", config.slack.channel_id);
    info!("  Database: {}", config.digitalocean.database_id);
    info!("  Poll interval: {}s", config.poll.interval_secs);

    let provider = DigitalOceanClient::new(config.digitalocean.clone());

    // One-shot discovery mode for filling in digitalocean.database_id.
    if list_databases {
        let databases = provider.list_databases().await?;
        for db in &databases {
            println!("{}: {}", db.name, db.id);
        }
        return Ok(());
    }

    let source = SlackClient::new(config.slack.clone());
    let mut bot = Bot::new(
        Arc::new(source),
        Arc::new(provider),
        config.slack.channel_id.clone(),
        config.digitalocean.database_id.clone(),
        Duration::from_secs(config.poll.interval_secs),
    );

    info!("Bot iniciado. Esperando comandos...");
    tokio::select! {
        result = bot.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Bot detenido manualmente. Saliendo...");
        }
    }

    info!("Proceso terminado.");
    Ok(())
}
