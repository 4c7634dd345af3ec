//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[rocket]
; Telemetry protocol of the avionics: 2017, 2018 or 2019
;   2017 - position only, coordinates in NMEA ddmm.mmmm
;   2018 - adds temperature, accelerometer, magnetometer and gyroscope
;   2019 - adds board states and supply voltage
packet_version = {}
; Samples per second sent by the avionics (default: 1)
sampling_frequency = {}
; Target apogee in feet (default: 10000)
target_altitude = {}

[gps]
; UTM zone of the launch site, number and hemisphere (default: 13N)
utm_zone = {}
; Seconds of pad data averaged into the base camp position (default: 10)
initialization_delay = {}

[orientation]
; Seconds of pad data used to find the resting attitude (default: 10)
initialization_delay = {}

[replay]
; Highest replay speed multiplier, a power of two (default: 16)
max_speed = {}
; Pause at either end of a recording, in milliseconds (default: 100)
end_of_playback_delay_ms = {}

[display]
; Display refreshes per second (default: 10)
refresh_rate = {}

[live]
; Read timeout on the radio link, in milliseconds (default: 500)
recv_timeout_ms = {}

[logging]
; Log file location (default: ~/.basestation/basestation.log)
file = {}
"#,
        config.rocket.packet_version,
        config.rocket.sampling_frequency,
        config.rocket.target_altitude,
        config.gps.utm_zone,
        config.gps.initialization_delay,
        config.orientation.initialization_delay,
        config.replay.max_speed,
        config.replay.end_of_playback_delay_ms,
        config.display.refresh_rate,
        config.live.recv_timeout_ms,
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
