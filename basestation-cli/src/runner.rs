//! Shared start-up for the commands that process telemetry.
//!
//! `live`, `replay` and `inspect` all need the station configuration and a
//! log file; `config` does not and skips the runner.

use tracing::info;

use basestation::config::ConfigFile;
use basestation::logging::{init_logging, split_log_path, LoggingGuard};

use crate::error::CliError;

/// Configuration plus the logging guard, held for the whole command.
pub struct CliRunner {
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// `stdout_enabled` mirrors log lines to the terminal; keep it off for
    /// commands that print telemetry continuously.
    pub fn new(debug_mode: bool, stdout_enabled: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, stdout_enabled, debug_mode)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Record the version and the rocket setup at the top of the log.
    pub fn log_startup(&self, command: &str) {
        info!(
            version = basestation::VERSION,
            command,
            packet_version = %self.config.rocket.packet_version,
            sampling_frequency = self.config.rocket.sampling_frequency,
            utm_zone = %self.config.gps.utm_zone,
            "BaseStation started"
        );
    }
}
