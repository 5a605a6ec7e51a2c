use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;

use ultra::app::{build_http_client, App, AppEvent};
use ultra::config::{self, Config};
use ultra::feed::{FeedClient, Location};
use ultra::ui;

#[derive(Parser, Debug)]
#[command(name = "ultra", about = "Terminal client for the Ultra News feed")]
struct Args {
    /// Location to open at startup, e.g. "/tech?page=2" or "/article/some-slug"
    #[arg(value_name = "LOCATION")]
    location: Option<String>,

    /// Backend base URL (overrides ULTRA_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Config file (default: ~/.config/ultra/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file (default: ~/.config/ultra/ultra.log)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Send tracing output to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = config::config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| config_dir.join("ultra.log"));
    init_logging(&log_path)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    let api_base = config::resolve_api_base(
        args.api_url.as_deref(),
        |key| std::env::var(key).ok(),
        config.api_base_url.as_deref(),
    );
    tracing::info!(api_base = %api_base, "Starting ultra");

    let http = build_http_client()?;
    let feed_client = FeedClient::new(http, &api_base).context("Invalid backend base URL")?;
    let mut app = App::new(feed_client, &config);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    let start = Location::parse(args.location.as_deref().unwrap_or("/"));
    ui::navigate(&mut app, start, false, &event_tx);

    ui::run(&mut app, event_tx, event_rx).await?;

    tracing::info!("Exiting ultra");
    Ok(())
}
