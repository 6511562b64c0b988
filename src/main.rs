use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

mod config;
mod engine;
mod fetch;
mod models;
mod notify;
mod recorder;
mod utils;

use crate::config::Config;
use crate::engine::Watcher;
use crate::recorder::Recorder;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::INFO.into()))
        .with_ansi(true)
        .init();

    let config = Config::from_env().with_context(|| "Invalid configuration")?;

    if let Some(watcher_config) = config.watcher {
        let watcher = Watcher::new(watcher_config)?;
        tokio::spawn(async move {
            if let Err(e) = watcher.run().await {
                tracing::error!("Watcher pipeline failed: {}", e);
            }
        });
    }

    if let Some(recorder_config) = config.recorder {
        let recorder = Recorder::new(recorder_config);
        tokio::spawn(async move {
            if let Err(e) = recorder.run().await {
                tracing::error!("Recorder pipeline failed: {}", e);
            }
        });
    }

    signal::ctrl_c().await?;
    info!("Shutdown signal received. Closing SlotWatch...");

    Ok(())
}
