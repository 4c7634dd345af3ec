//! Reading and writing `config.ini`.
//!
//! The file lives in `~/.basestation`. A station that never ran
//! `basestation config init` has no file and runs on the defaults from
//! [`super::defaults`]; values are checked by [`super::parser`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A key holds a value the ground station cannot run with.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load `~/.basestation/config.ini`, or the defaults if there is none.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.is_file() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        super::parser::parse_ini(&ini)
    }

    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Write to `path`, creating missing parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_error = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        std::fs::write(path, self.to_ini_string()).map_err(write_error)
    }

    /// Commented INI text of this configuration, as written by `save_to`.
    pub fn to_ini_string(&self) -> String {
        super::writer::to_config_string(self)
    }

    /// Write the defaults to `path` unless a file is already there.
    ///
    /// Returns true if a file was written.
    pub fn ensure_exists_at(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }
}

/// `~/.basestation`, or `./.basestation` when there is no home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".basestation")
}

/// `~/.basestation/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use crate::packet::PacketVersion;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_describe_spaceport_flight() {
        let config = ConfigFile::default();

        assert_eq!(config.rocket.packet_version, DEFAULT_PACKET_VERSION);
        assert_eq!(config.rocket.sampling_frequency, 1.0);
        assert_eq!(config.gps.utm_zone.to_string(), "13N");
        assert_eq!(config.replay.max_speed, 16);
        assert_eq!(config.replay.end_of_playback_delay_ms, 100);
        assert!(config.logging.file.ends_with(".basestation/basestation.log"));
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let station = TempDir::new().unwrap();
        let path = station.path().join("config.ini");

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_saved_station_settings_load_back() {
        let station = TempDir::new().unwrap();
        let path = station.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.rocket.packet_version = PacketVersion::V2017;
        config.gps.utm_zone = "56S".parse().unwrap();
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded.rocket.packet_version, PacketVersion::V2017);
        assert_eq!(loaded.gps.utm_zone.to_string(), "56S");
    }

    #[test]
    fn test_ensure_exists_writes_once() {
        let station = TempDir::new().unwrap();
        let path = station.path().join("nested").join("config.ini");

        assert!(ConfigFile::ensure_exists_at(&path).unwrap());
        assert!(path.exists());
        assert!(!ConfigFile::ensure_exists_at(&path).unwrap());
    }

    #[test]
    fn test_unwritable_path_reports_it() {
        let station = TempDir::new().unwrap();
        // A directory where the file should be.
        let path = station.path().join("config.ini");
        std::fs::create_dir(&path).unwrap();

        match ConfigFile::default().save_to(&path) {
            Err(ConfigFileError::Write { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a write error, got {:?}", other),
        }
    }

    #[test]
    fn test_runtime_configs() {
        let mut config = ConfigFile::default();
        config.rocket.sampling_frequency = 20.0;
        config.display.refresh_rate = 4.0;

        assert_eq!(config.processing_config().sampling_frequency, 20.0);
        assert_eq!(config.replay_config().sampling_frequency, 20.0);
        assert_eq!(
            config.replay_config().end_of_playback_delay,
            Duration::from_millis(100)
        );
        assert_eq!(config.refresh_interval(), Duration::from_millis(250));
        assert_eq!(config.live_config().recv_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_refresh_interval_never_zero() {
        let mut config = ConfigFile::default();
        config.display.refresh_rate = 1e300;

        assert_eq!(config.refresh_interval(), Duration::from_millis(1));
    }
}
