//! Logging configuration for IdeaSpark

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::Result;

const LOGS_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "ideaspark.log";

/// Initialize logging with configuration
pub fn init_logging_with_config(config: Option<&crate::config::AppConfig>) -> Result<()> {
    let (env_filter, level) = match config {
        Some(config) => {
            if config.logging.backtrace && std::env::var_os("RUST_BACKTRACE").is_none() {
                std::env::set_var("RUST_BACKTRACE", "1");
            }
            let level = config.logging.level.as_str();
            (level_filter(level), level.to_string())
        }
        // Fallback to environment variable or default
        None => (
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ideaspark=debug")),
            "info".to_string(),
        ),
    };

    install(env_filter, &level)
}

/// Initialize logging with custom log level
pub fn init_logging_with_level(level: &str) -> Result<()> {
    install(level_filter(level), level)
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("{level},ideaspark={level}"))
}

fn install(env_filter: EnvFilter, level: &str) -> Result<()> {
    let logs_dir = Path::new(LOGS_DIR);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    let file_appender = tracing_appender::rolling::daily(LOGS_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::IdeaSparkError::Custom(format!("Logging already initialized: {e}")))?;

    tracing::info!("Logging initialized with level: {} - console and file output enabled", level);
    tracing::info!("Log files will be saved to: {}/{}.YYYY-MM-DD", LOGS_DIR, LOG_FILE_PREFIX);

    // The writer thread must outlive main
    std::mem::forget(guard);

    Ok(())
}

/// Initialize simple console-only logging for one-shot commands and tests
pub fn init_simple_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| crate::IdeaSparkError::Custom(format!("Logging already initialized: {e}")))?;

    tracing::debug!("Simple logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_logging_is_reentrant_safe() {
        // A second global subscriber is refused rather than panicking
        let _ = init_simple_logging();
        assert!(init_simple_logging().is_err());
    }
}
