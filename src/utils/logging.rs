//! File logging for the launcher.
//!
//! The terminal belongs to the UI, so tracing output goes to
//! `<log_dir>/applaunch.log`. Level defaults to `info`, `RUST_LOG` overrides.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;

pub fn init_logging(log_dir: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(log_dir).map_err(|source| ConfigError::Read {
        path: log_dir.display().to_string(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("applaunch")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    let subscriber = fmt()
        .with_writer(appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::info!("applaunch v{} started", env!("CARGO_PKG_VERSION"));
    Ok(())
}
