pub mod config;
pub mod db;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for embedding callers (CLI or UI shell).
/// Honors RUST_LOG, falling back to the application default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);
}
