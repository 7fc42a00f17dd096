//! Logging setup
//!
//! The crate logs through the `log` facade; binaries call [`init_logging`]
//! once at startup to install `env_logger` with the configured filter.

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

use crate::core::config::LoggingConfig;

static INIT: Once = Once::new();

/// Install the global logger. Calls after the first are ignored.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = filter_for(config, std::env::var("RUST_LOG").ok());
        let installed = env_logger::Builder::new()
            .parse_filters(&filter)
            .format_timestamp_millis()
            .try_init();
        if installed.is_ok() {
            debug!("Logging initialized with filter \"{}\"", filter);
        }
    });
}

/// Filter string the logger is built with
fn filter_for(config: &LoggingConfig, env: Option<String>) -> String {
    match env {
        Some(env) if config.respect_env && !env.trim().is_empty() => env,
        _ => config.level.clone(),
    }
}
