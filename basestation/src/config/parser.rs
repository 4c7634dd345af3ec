//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::defaults::{MAX_INITIALIZATION_DELAY, MAX_REFRESH_RATE};
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::packet::PacketVersion;
use crate::processing::UtmZone;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [rocket] section
    if let Some(section) = ini.section(Some("rocket")) {
        if let Some(v) = section.get("packet_version") {
            let number: u16 = parse_value(
                "rocket",
                "packet_version",
                v,
                "must be one of: 2017, 2018, 2019",
            )?;
            config.rocket.packet_version = PacketVersion::try_from(number)
                .map_err(|e| invalid("rocket", "packet_version", v, &e.to_string()))?;
        }
        if let Some(v) = section.get("sampling_frequency") {
            config.rocket.sampling_frequency = parse_positive(
                "rocket",
                "sampling_frequency",
                v,
                "must be a positive number (Hz)",
            )?;
        }
        if let Some(v) = section.get("target_altitude") {
            config.rocket.target_altitude =
                parse_value("rocket", "target_altitude", v, "must be a number (feet)")?;
        }
    }

    // [gps] section
    if let Some(section) = ini.section(Some("gps")) {
        if let Some(v) = section.get("utm_zone") {
            config.gps.utm_zone = v.parse::<UtmZone>().map_err(|_| {
                invalid("gps", "utm_zone", v, "expected a zone like '13N' or '56S'")
            })?;
        }
        if let Some(v) = section.get("initialization_delay") {
            config.gps.initialization_delay = parse_delay("gps", v)?;
        }
    }

    // [orientation] section
    if let Some(section) = ini.section(Some("orientation")) {
        if let Some(v) = section.get("initialization_delay") {
            config.orientation.initialization_delay = parse_delay("orientation", v)?;
        }
    }

    // [replay] section
    if let Some(section) = ini.section(Some("replay")) {
        if let Some(v) = section.get("max_speed") {
            let reason = "must be a power of two (1, 2, 4, 8, ...)";
            let speed: u32 = parse_value("replay", "max_speed", v, reason)?;
            if !speed.is_power_of_two() {
                return Err(invalid("replay", "max_speed", v, reason));
            }
            config.replay.max_speed = speed;
        }
        if let Some(v) = section.get("end_of_playback_delay_ms") {
            config.replay.end_of_playback_delay_ms = parse_value(
                "replay",
                "end_of_playback_delay_ms",
                v,
                "must be a non-negative integer (milliseconds)",
            )?;
        }
    }

    // [display] section
    if let Some(section) = ini.section(Some("display")) {
        if let Some(v) = section.get("refresh_rate") {
            let reason = "must be a positive number (Hz), at most 1000";
            let rate = parse_positive("display", "refresh_rate", v, reason)?;
            if rate > MAX_REFRESH_RATE {
                return Err(invalid("display", "refresh_rate", v, reason));
            }
            config.display.refresh_rate = rate;
        }
    }

    // [live] section
    if let Some(section) = ini.section(Some("live")) {
        if let Some(v) = section.get("recv_timeout_ms") {
            let reason = "must be a positive integer (milliseconds)";
            let timeout: u64 = parse_value("live", "recv_timeout_ms", v, reason)?;
            if timeout == 0 {
                return Err(invalid("live", "recv_timeout_ms", v, reason));
            }
            config.live.recv_timeout_ms = timeout;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<f64, ConfigFileError> {
    let number: f64 = parse_value(section, key, value, reason)?;
    if number.is_finite() && number > 0.0 {
        Ok(number)
    } else {
        Err(invalid(section, key, value, reason))
    }
}

fn parse_non_negative(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<f64, ConfigFileError> {
    let number: f64 = parse_value(section, key, value, reason)?;
    if number.is_finite() && number >= 0.0 {
        Ok(number)
    } else {
        Err(invalid(section, key, value, reason))
    }
}

/// Initialization window length in seconds, bounded by `MAX_INITIALIZATION_DELAY`.
fn parse_delay(section: &str, value: &str) -> Result<f64, ConfigFileError> {
    let reason = "must be a non-negative number of seconds, at most 3600";
    let delay = parse_non_negative(section, "initialization_delay", value, reason)?;
    if delay > MAX_INITIALIZATION_DELAY {
        return Err(invalid(section, "initialization_delay", value, reason));
    }
    Ok(delay)
}

/// Expand `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
