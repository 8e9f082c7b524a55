//! Process-wide logging setup.
//!
//! `log::` records (sqlx, startup diagnostics) are bridged into `tracing`, and
//! a single subscriber writes JSON or pretty lines depending on configuration.

use std::any::type_name_of_val;
use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;
use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::Layer,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::AppConfig;

/// Errors that can occur while initializing global telemetry.
#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("failed to install log tracer bridge: {0}")]
    LogTracer(#[from] log::SetLoggerError),
}

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Filter used when `RUST_LOG` is unset. Per-statement sqlx logging is kept
/// at warn unless the configured level asks for more detail.
fn default_filter(config: &AppConfig) -> String {
    let sqlx_level = match config.log_level.as_str() {
        "debug" | "trace" => config.log_level.as_str(),
        _ => "warn",
    };
    format!("{},sqlx={}", config.log_level, sqlx_level)
}

fn install_log_bridge() -> Result<(), log::SetLoggerError> {
    match LogTracer::builder().with_max_level(LevelFilter::Trace).init() {
        Ok(()) => Ok(()),
        // Another LogTracer already installed is fine.
        Err(_) if type_name_of_val(log::logger()).contains("LogTracer") => Ok(()),
        Err(err) => Err(err),
    }
}

/// Installs the global subscriber once; later calls are no-ops.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryInitError> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    if let Err(err) = install_log_bridge() {
        INSTALLED.store(false, Ordering::SeqCst);
        return Err(err.into());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));
    let output = if config.log_format == "pretty" {
        fmt::layer().pretty().boxed()
    } else {
        fmt::layer().json().flatten_event(true).boxed()
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
    {
        INSTALLED.store(false, Ordering::SeqCst);
        eprintln!("Warning: tracing subscriber not installed ({err}); keeping the existing one.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let config = AppConfig {
            log_format: "pretty".to_string(),
            ..Default::default()
        };

        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }

    #[test]
    fn test_default_filter_quiets_sqlx() {
        let config = AppConfig::default();
        assert_eq!(default_filter(&config), "info,sqlx=warn");

        let config = AppConfig {
            log_level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(default_filter(&config), "debug,sqlx=debug");
    }
}
