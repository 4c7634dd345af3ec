//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types; conversion into the runtime configuration of
//! each component lives on [`ConfigFile`].

use std::path::PathBuf;
use std::time::Duration;

use crate::packet::PacketVersion;
use crate::processing::{ProcessingConfig, UtmZone};
use crate::producer::{LiveConfig, ReplayConfig};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub rocket: RocketSettings,
    pub gps: GpsSettings,
    pub orientation: OrientationSettings,
    pub replay: ReplaySettings,
    pub display: DisplaySettings,
    pub live: LiveSettings,
    pub logging: LoggingSettings,
}

/// Flight computer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RocketSettings {
    /// Telemetry protocol the avionics speak
    pub packet_version: PacketVersion,
    /// Samples per second sent by the avionics
    pub sampling_frequency: f64,
    /// Target apogee in feet, shown next to the altitude
    pub target_altitude: f64,
}

/// GPS fusion settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsSettings {
    /// UTM zone of the launch site
    pub utm_zone: UtmZone,
    /// Seconds of pad data averaged into the base camp
    pub initialization_delay: f64,
}

/// Attitude estimation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationSettings {
    /// Seconds of pad data averaged into the resting attitude
    pub initialization_delay: f64,
}

/// Replay settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySettings {
    /// Highest speed multiplier, a power of two
    pub max_speed: u32,
    /// Pause at either end of a recording, in milliseconds
    pub end_of_playback_delay_ms: u64,
}

/// Display settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    /// Refreshes per second
    pub refresh_rate: f64,
}

/// Live acquisition settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSettings {
    /// Read timeout on the radio link, in milliseconds
    pub recv_timeout_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}

impl ConfigFile {
    pub fn processing_config(&self) -> ProcessingConfig {
        ProcessingConfig {
            packet_version: self.rocket.packet_version,
            sampling_frequency: self.rocket.sampling_frequency,
            utm_zone: self.gps.utm_zone,
            gps_initialization_delay: self.gps.initialization_delay,
            orientation_initialization_delay: self.orientation.initialization_delay,
        }
    }

    pub fn replay_config(&self) -> ReplayConfig {
        ReplayConfig {
            sampling_frequency: self.rocket.sampling_frequency,
            max_speed: self.replay.max_speed,
            end_of_playback_delay: Duration::from_millis(self.replay.end_of_playback_delay_ms),
        }
    }

    pub fn live_config(&self) -> LiveConfig {
        LiveConfig {
            recv_timeout: Duration::from_millis(self.live.recv_timeout_ms),
            ..Default::default()
        }
    }

    /// Time between two display refreshes.
    pub fn refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.display.refresh_rate)
            .unwrap_or(crate::session::DEFAULT_REFRESH_INTERVAL)
            .max(crate::session::MIN_REFRESH_INTERVAL)
    }
}
