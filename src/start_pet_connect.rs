//! Startup helpers for the Pet Connect server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::core::errors::AppResult;
use crate::faq::seed_defaults;
use crate::server::{self, AppState};

/// Run the server (used by the `pet-connect-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Pet Connect v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    let port = config.server.port;

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let result = rt.block_on(async move {
        let state = initialize(config).await?;
        server::run_server(state, port).await
    });

    if let Err(e) = result {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Build the application state and seed the FAQ corpus when it is empty.
///
/// # Errors
/// Returns an error if the configuration is invalid or storage fails.
pub async fn initialize(config: AppConfig) -> AppResult<Arc<AppState>> {
    tracing::info!("Database: {}", config.storage.sqlite_path.display());
    let state = AppState::new(config).await?;
    seed_defaults(state.faqs.as_ref()).await?;
    Ok(state)
}
