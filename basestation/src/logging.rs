//! Logging infrastructure for the ground station.
//!
//! Provides structured logging with file output and optional console output:
//! - Writes to `~/.basestation/basestation.log` (cleared on session start)
//! - Optionally mirrors to stdout, off while a live display owns the terminal
//! - Configurable via RUST_LOG environment variable, `--debug` lowers the
//!   default level to DEBUG

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer running; drop it last to flush the file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber for one ground-station session.
///
/// Each session starts with an empty log file, so a flight's log holds only
/// that flight. `debug` lowers the default level when RUST_LOG is unset;
/// `stdout_enabled` mirrors log lines to the terminal.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    stdout_enabled: bool,
    debug: bool,
) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let (writer, file_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_file));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    let stdout_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create `log_dir` and truncate the log file inside it.
pub fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

/// RUST_LOG if set, otherwise INFO (DEBUG with `debug`).
fn env_filter(debug: bool) -> EnvFilter {
    let default_level = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Split a configured log path into directory and file name.
pub fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| default_log_file().to_string());
    (dir, file)
}

/// File name used when the configured log path has none.
pub fn default_log_file() -> &'static str {
    crate::config::DEFAULT_LOG_FILE_NAME
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_station_directory_and_file() {
        let home = TempDir::new().unwrap();
        let log_dir = home.path().join(".basestation").join("logs");

        let log_path = prepare_log_file(&log_dir, "basestation.log").unwrap();

        assert!(log_dir.exists());
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_prepare_clears_previous_session() {
        let home = TempDir::new().unwrap();
        let log_path = home.path().join("basestation.log");
        fs::write(&log_path, "INFO Replay started\n").unwrap();

        prepare_log_file(home.path(), "basestation.log").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_split_log_path() {
        let (dir, file) = split_log_path(Path::new("/var/log/basestation.log"));
        assert_eq!(dir, PathBuf::from("/var/log"));
        assert_eq!(file, "basestation.log");

        let (dir, file) = split_log_path(Path::new("flight.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(file, "flight.log");
    }

    #[test]
    fn test_split_log_path_without_file_name_uses_default() {
        let (dir, file) = split_log_path(Path::new("/"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(file, default_log_file());
    }
}
