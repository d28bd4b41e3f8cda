//! Tracing initialization and subscriber setup.
//!
//! Configures the tracing subscriber pipeline from `tracing` macros to the
//! rotating log file.

use super::file_writer::FileWriter;
use crate::infrastructure::log_path;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither `RUST_LOG` nor `trace_level` is set.
const DEFAULT_LEVEL: &str = "info";

/// Initializes the tracing subscriber writing to `cityfinder.log` in the data
/// directory.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently returns if directory creation fails (logging is optional)
/// - Idempotent: only the first call installs a subscriber
///
/// Returns `true` if a subscriber was installed by this call.
pub fn init_tracing(config: &Config) -> bool {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    let data_dir = config.data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(FileWriter::new(log_path(&data_dir)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(data_dir = %data_dir.display(), level = %level, "cityfinder tracing initialized");
    }
    installed
}
