//! Plain-text telemetry view.
//!
//! Prints one line per refresh. Used by `live` and `replay`.

use basestation::processing::METERS_TO_FEET;
use basestation::session::{TelemetrySink, TelemetrySnapshot};

/// Sink that writes each snapshot to stdout.
pub struct TerminalSink {
    target_altitude: f64,
}

impl TerminalSink {
    /// `target_altitude` is in feet; zero or less hides the progress figure.
    pub fn new(target_altitude: f64) -> Self {
        Self { target_altitude }
    }
}

impl TelemetrySink for TerminalSink {
    fn render(&mut self, snapshot: &TelemetrySnapshot) {
        println!("{}", format_snapshot(snapshot, self.target_altitude));
    }
}

/// Format a snapshot as a single status line.
pub fn format_snapshot(snapshot: &TelemetrySnapshot, target_altitude: f64) -> String {
    let mut line = format!(
        "t={:>6} | alt {:>9.1} ft",
        snapshot.time_stamp, snapshot.altitude_feet
    );

    if target_altitude > 0.0 {
        line.push_str(&format!(
            " ({:>5.1}%)",
            snapshot.altitude_feet / target_altitude * 100.0
        ));
    }

    let (roll, pitch, yaw) = snapshot.orientation.to_euler();
    line.push_str(&format!(
        " | pos {:>+9.1} E {:>+9.1} N m | rpy {:>+6.1} {:>+6.1} {:>+6.1} deg",
        snapshot.easting,
        snapshot.northing,
        roll.to_degrees(),
        pitch.to_degrees(),
        yaw.to_degrees()
    ));

    if let Some(apogee) = snapshot.apogee {
        line.push_str(&format!(
            " | apogee {:.1} ft @ {}",
            apogee.altitude * METERS_TO_FEET,
            apogee.time_stamp
        ));
    }

    if let Some(temperature) = snapshot.temperature {
        line.push_str(&format!(" | {:.1} C", temperature));
    }

    line.push_str(&format!(
        " | {:.2} V | boards {}",
        snapshot.voltage,
        board_flags(&snapshot.board_states)
    ));

    line
}

fn board_flags(states: &[bool; 6]) -> String {
    states.iter().map(|up| if *up { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use basestation::processing::{Apogee, Quaternion};

    fn snapshot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            packets: 3,
            time_stamp: 42,
            altitude_feet: 5000.0,
            easting: 12.34,
            northing: -5.0,
            orientation: Quaternion::IDENTITY,
            apogee: Some(Apogee {
                time_stamp: 40,
                altitude: 1000.0,
            }),
            temperature: Some(21.5),
            gps_coordinates: None,
            voltage: 7.9,
            board_states: [true, true, false, true, false, true],
        }
    }

    #[test]
    fn test_format_includes_target_progress() {
        let line = format_snapshot(&snapshot(), 10_000.0);

        assert!(line.starts_with("t=    42"));
        assert!(line.contains("5000.0 ft ( 50.0%)"));
        assert!(line.contains("apogee 3280.8 ft @ 40"));
        assert!(line.contains("21.5 C"));
        assert!(line.contains("7.90 V"));
        assert!(line.ends_with("boards 110101"));
    }

    #[test]
    fn test_format_without_target_or_optional_values() {
        let mut snapshot = snapshot();
        snapshot.apogee = None;
        snapshot.temperature = None;

        let line = format_snapshot(&snapshot, 0.0);

        assert!(!line.contains('%'));
        assert!(!line.contains("apogee"));
        assert!(!line.contains(" C |"));
        assert!(line.contains("+12.3 E"));
        assert!(line.contains("-5.0 N"));
    }
}
