pub mod format;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;
use self::format::ChainscopeFormat;

/// Install the global subscriber: terminal output plus a daily-rolling file
/// when a log directory is configured. The returned guard must be held for
/// the life of the process or buffered file output is lost.
pub fn setup_tracing(
    logging: &LoggingConfig,
    engine_name: &str,
) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let format = ChainscopeFormat {
        engine_name: engine_name.to_string(),
    };

    let terminal_layer = tracing_subscriber::fmt::Layer::default()
        .with_ansi(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .event_format(format.clone());

    let (file_layer, guard) = match logging.directory.as_deref() {
        Some(dir) => {
            let logs_dir = Path::new(dir);
            if !logs_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(logs_dir) {
                    eprintln!("failed_to_create_logs_directory::{}::{}", logs_dir.display(), e);
                }
            }
            let appender =
                RollingFileAppender::new(Rotation::DAILY, logs_dir, format!("{}.log", engine_name));
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::Layer::default()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .event_format(format.clone())
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        },
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(terminal_layer)
        .with(file_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Error setting up logging: {}", e);
        return None;
    }

    tracing::info!("{}_logging_started", engine_name);
    guard
}
