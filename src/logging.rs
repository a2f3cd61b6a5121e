//! File logging; the terminal belongs to the UI.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "pokedex=info";

#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error("log file path has no file name: {0}")]
    InvalidPath(String),
    #[error("failed to create log directory: {0}")]
    Directory(#[from] std::io::Error),
    #[error("failed to install subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber writing to `path`.
///
/// Keep the returned guard alive until shutdown so buffered lines are flushed.
pub fn init(path: &Path) -> Result<WorkerGuard, LoggingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(guard)
}
