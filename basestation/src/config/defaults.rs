//! Default values and constants for all configuration settings.

use super::file::config_directory;
use super::settings::*;
use crate::packet::PacketVersion;
use crate::processing::UtmZone;

/// Protocol of the current avionics.
pub const DEFAULT_PACKET_VERSION: PacketVersion = PacketVersion::V2019;
pub const DEFAULT_SAMPLING_FREQUENCY: f64 = 1.0;
pub const DEFAULT_TARGET_ALTITUDE: f64 = 10_000.0;
pub const DEFAULT_GPS_INITIALIZATION_DELAY: f64 = 10.0;
pub const DEFAULT_ORIENTATION_INITIALIZATION_DELAY: f64 = 10.0;
pub const DEFAULT_MAX_SPEED: u32 = crate::producer::replay::DEFAULT_MAX_SPEED;
/// Longest accepted initialization window, one hour on the pad.
pub const MAX_INITIALIZATION_DELAY: f64 = 3600.0;
/// Fastest display refresh the session loop is asked for.
pub const MAX_REFRESH_RATE: f64 = 1000.0;
pub const DEFAULT_END_OF_PLAYBACK_DELAY_MS: u64 = 100;
pub const DEFAULT_REFRESH_RATE: f64 = 10.0;
pub const DEFAULT_RECV_TIMEOUT_MS: u64 = 500;
pub const DEFAULT_LOG_FILE_NAME: &str = "basestation.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            rocket: RocketSettings {
                packet_version: DEFAULT_PACKET_VERSION,
                sampling_frequency: DEFAULT_SAMPLING_FREQUENCY,
                target_altitude: DEFAULT_TARGET_ALTITUDE,
            },
            gps: GpsSettings {
                utm_zone: UtmZone::default(),
                initialization_delay: DEFAULT_GPS_INITIALIZATION_DELAY,
            },
            orientation: OrientationSettings {
                initialization_delay: DEFAULT_ORIENTATION_INITIALIZATION_DELAY,
            },
            replay: ReplaySettings {
                max_speed: DEFAULT_MAX_SPEED,
                end_of_playback_delay_ms: DEFAULT_END_OF_PLAYBACK_DELAY_MS,
            },
            display: DisplaySettings {
                refresh_rate: DEFAULT_REFRESH_RATE,
            },
            live: LiveSettings {
                recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
