use std::path::Path;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::Config;

/// Initialize tracing with optional file output.
///
/// Nothing is installed unless the config names a log file, since any output
/// on the terminal would corrupt the board display. `RUST_LOG` overrides the
/// configured level.
pub fn init_tracing(config: &Config) {
    let Some(log_path) = config.log_file.as_deref() else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    let Some(file) = open_log_file(log_path) else {
        eprintln!("Warning: Failed to create log file: {}", log_path.display());
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
