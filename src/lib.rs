pub mod api;
pub mod config;
pub mod export;
pub mod metadata;
pub mod schema;
pub mod session;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses. Library
/// callers that already have a subscriber should skip this.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
