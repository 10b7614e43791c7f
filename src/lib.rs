pub mod cleanup;
pub mod config;
pub mod excel;
pub mod merge;
pub mod server;

use config::{Config, ConfigError};
use server::ServeError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Serve(#[from] ServeError),
}

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`).
/// Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

pub async fn run() -> Result<(), StartupError> {
    // .env is optional
    let _ = dotenv::dotenv();
    init_tracing();

    tracing::info!("Starting gradesheet merge service");

    let config = Config::from_env()?;
    tracing::info!(
        storage = %config.storage_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Loaded configuration"
    );

    server::serve(config).await?;
    Ok(())
}
