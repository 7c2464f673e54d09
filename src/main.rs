//! FileVault server: folder hierarchy and file placement over an object store.
//!
//! Main entry point that loads configuration, installs logging and starts the
//! HTTP server.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use filevault_core::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load(&run_mode).context("Failed to load configuration")?;

    init_logging(&config);
    tracing::info!(
        run_mode = %run_mode,
        "Starting FileVault v{}",
        env!("CARGO_PKG_VERSION")
    );

    filevault_api::run_server(config)
        .await
        .context("Server error")?;

    Ok(())
}

/// Initialize tracing/logging. `RUST_LOG` overrides the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
