use tracing_subscriber::EnvFilter;

use crate::error::StoreError;

/// Installs a compact stderr subscriber; `RUST_LOG` wins over `default_filter`.
pub fn init_logging(default_filter: &str) -> Result<(), StoreError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| StoreError::Config(format!("invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| StoreError::Config(format!("logging already initialized: {e}")))
}
