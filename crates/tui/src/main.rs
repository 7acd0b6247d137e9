mod app;
mod theme;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use chrono::Local;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use homedeck_core::{
    catalog::Catalog,
    config::{self, AppConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config)?;

    // Resolve the host timezone once; it never changes for the lifetime
    // of the screen.
    let timezone = *Local::now().offset();

    let mut app = app::HomeApp::new(catalog, config, timezone);
    app.run().await
}

fn load_catalog(config: &AppConfig) -> Result<Catalog> {
    match config.catalog_path.as_deref() {
        Some(path) if path.exists() => {
            let catalog = Catalog::load(path)?;
            info!(
                path = %path.display(),
                players = catalog.players.len(),
                games = catalog.games.len(),
                "catalog loaded"
            );
            Ok(catalog)
        }
        Some(path) => {
            let catalog = Catalog::builtin();
            catalog.persist(path)?;
            info!(path = %path.display(), "seeded default catalog");
            Ok(catalog)
        }
        None => Ok(Catalog::builtin()),
    }
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("homedeck.log");

    let env_filter = EnvFilter::from_default_env();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
