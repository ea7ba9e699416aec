//! Logging infrastructure.
//!
//! Structured logging via `tracing` with dual output: a non-blocking
//! file writer plus the terminal, filtered through `RUST_LOG` (INFO by
//! default). Library code only emits events; initialization is the
//! binary's job.

use std::fs;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initializes the global subscriber with file and stderr output.
///
/// Creates the log directory if needed and truncates the previous
/// session's log file.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(&settings.directory)?;

    let log_path = std::path::Path::new(&settings.directory).join(&settings.file);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(&settings.directory, &settings.file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .compact();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // The global subscriber can only be installed once per process, so
    // everything about init lives in this single test.
    #[test]
    fn init_creates_directory_and_truncates_previous_log() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        let settings = LoggingSettings {
            directory: log_dir.to_str().unwrap().to_string(),
            file: "test.log".to_string(),
        };

        // Pre-seed a stale log to verify truncation
        fs::create_dir_all(&log_dir).unwrap();
        fs::write(log_dir.join("test.log"), "stale").unwrap();

        let guard = init_logging(&settings).unwrap();

        let contents = fs::read_to_string(log_dir.join("test.log")).unwrap();
        assert!(contents.is_empty());
        drop(guard);
    }
}
