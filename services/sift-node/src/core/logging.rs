//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::config::{LogFormat, LoggingConfig};
use crate::core::error::{Result, SiftError};

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(config: &LoggingConfig) -> String {
    format!("sift={}", config.level)
}

/// Install the global subscriber. Log lines go to stderr so command
/// output on stdout stays machine-readable.
///
/// `RUST_LOG` overrides the configured level when present.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| SiftError::ConfigError(format!("Failed to install logger: {e}")))
}
