pub mod config;
pub mod error;

pub use config::{Config, ValidationResult};
pub use error::{AppError, ConfigError, NetworkError, WeatherError};

use anyhow::Result;

/// Initialize diagnostics logging
///
/// `RUST_LOG` controls the filter; the default keeps stderr quiet so it does
/// not interleave with terminal output.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Stratus core initialized");
    Ok(())
}
