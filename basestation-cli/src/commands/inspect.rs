//! Inspect command - process a whole recording at once and summarize it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use basestation::packet::Packet;
use basestation::persistence::{CsvPersister, DataPersister};
use basestation::processing::{
    Apogee, BaseCamp, Consumer, ConsumerFactory, Quaternion, UtmZone, METERS_TO_FEET,
};
use basestation::producer::ReplayProducer;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the inspect command.
#[derive(Debug, clap::Args)]
pub struct InspectArgs {
    /// Recording to summarize
    pub path: PathBuf,
}

/// What a recording says about the flight.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSummary {
    pub packets: usize,
    pub first_time_stamp: u32,
    pub last_time_stamp: u32,
    pub sampling_frequency: f64,
    pub apogee: Option<Apogee>,
    pub base_camp: Option<BaseCamp>,
    pub utm_zone: UtmZone,
    /// Largest horizontal distance from the base camp, in meters.
    pub max_range: f64,
    pub last_fix: Option<(f64, f64)>,
    pub orientation: Quaternion,
}

impl FlightSummary {
    /// Summarize a consumer that has processed every packet of `packets`.
    pub fn new(packets: &[Packet], consumer: &Consumer) -> Self {
        let (eastings, northings) = consumer.projected_coordinates();
        let max_range = eastings
            .iter()
            .zip(northings)
            .map(|(east, north)| east.hypot(*north))
            .fold(0.0, f64::max);

        Self {
            packets: packets.len(),
            first_time_stamp: packets.first().map(|p| p.time_stamp).unwrap_or_default(),
            last_time_stamp: packets.last().map(|p| p.time_stamp).unwrap_or_default(),
            sampling_frequency: consumer.config().sampling_frequency,
            apogee: consumer.apogee(),
            base_camp: consumer.base_camp(),
            utm_zone: consumer.config().utm_zone,
            max_range,
            last_fix: consumer.last_gps_coordinates(),
            orientation: consumer.orientation(),
        }
    }

    /// Flight duration in seconds.
    pub fn duration(&self) -> f64 {
        let ticks = f64::from(self.last_time_stamp.saturating_sub(self.first_time_stamp));
        if self.sampling_frequency > 0.0 {
            ticks / self.sampling_frequency
        } else {
            0.0
        }
    }
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Packets:    {} (time stamps {} to {}, {:.1} s at {} Hz)",
            self.packets,
            self.first_time_stamp,
            self.last_time_stamp,
            self.duration(),
            self.sampling_frequency
        )?;

        match self.apogee {
            Some(apogee) => writeln!(
                f,
                "Apogee:     {:.1} m ({:.1} ft) at time stamp {}",
                apogee.altitude,
                apogee.altitude * METERS_TO_FEET,
                apogee.time_stamp
            )?,
            None => writeln!(f, "Apogee:     -")?,
        }

        match self.base_camp {
            Some(camp) => {
                writeln!(
                    f,
                    "Base camp:  {:.1} E {:.1} N (zone {})",
                    camp.easting, camp.northing, self.utm_zone
                )?;
                writeln!(f, "Max range:  {:.1} m", self.max_range)?;
            }
            None => writeln!(f, "Base camp:  not resolved")?,
        }

        if let Some((latitude, longitude)) = self.last_fix {
            writeln!(f, "Last fix:   {:.6}, {:.6}", latitude, longitude)?;
        }

        let (roll, pitch, yaw) = self.orientation.to_euler();
        write!(
            f,
            "Attitude:   roll {:.1} pitch {:.1} yaw {:.1} deg",
            roll.to_degrees(),
            pitch.to_degrees(),
            yaw.to_degrees()
        )
    }
}

/// Run the inspect command.
pub fn run(args: InspectArgs, runner: &CliRunner) -> Result<(), CliError> {
    let config = runner.config();
    let packets = CsvPersister::new().load(&args.path)?;

    let summary = summarize(packets, config)?;

    println!("Recording:  {}", args.path.display());
    println!("{}", summary);
    Ok(())
}

/// Feed the whole recording through a consumer in one update.
fn summarize(
    packets: Vec<Packet>,
    config: &basestation::config::ConfigFile,
) -> Result<FlightSummary, CliError> {
    let producer = Arc::new(ReplayProducer::new(packets, config.replay_config())?);
    let mut consumer = ConsumerFactory::new(config.processing_config()).create(producer.clone());
    consumer.update();

    Ok(FlightSummary::new(&producer.available_packets(), &consumer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use basestation::config::ConfigFile;
    use basestation::packet::PacketVersion;

    fn flight() -> Vec<Packet> {
        (0..20)
            .map(|i| Packet {
                time_stamp: i * 2,
                latitude: 32.99,
                longitude: -106.97,
                altitude: (i as f32 * 100.0).min(1200.0),
                acceleration_z: 1.0,
                ..Default::default()
            })
            .collect()
    }

    fn config() -> ConfigFile {
        let mut config = ConfigFile::default();
        config.rocket.packet_version = PacketVersion::V2018;
        config.rocket.sampling_frequency = 2.0;
        config.gps.initialization_delay = 1.0;
        config.orientation.initialization_delay = 1.0;
        config
    }

    #[test]
    fn test_summary_of_whole_flight() {
        let summary = summarize(flight(), &config()).unwrap();

        assert_eq!(summary.packets, 20);
        assert_eq!(summary.first_time_stamp, 0);
        assert_eq!(summary.last_time_stamp, 38);
        assert_eq!(summary.duration(), 19.0);
        assert_eq!(
            summary.apogee,
            Some(Apogee {
                time_stamp: 24,
                altitude: 1200.0
            })
        );
        assert!(summary.base_camp.is_some());
        assert!(summary.max_range < 1e-6);
    }

    #[test]
    fn test_summary_display() {
        let text = summarize(flight(), &config()).unwrap().to_string();

        assert!(text.contains("Packets:    20 (time stamps 0 to 38, 19.0 s at 2 Hz)"));
        assert!(text.contains("Apogee:     1200.0 m (3937.0 ft) at time stamp 24"));
        assert!(text.contains("zone 13N"));
        assert!(text.contains("Last fix:   32.990"));
        assert!(text.contains(", -106.970"));
    }

    #[test]
    fn test_empty_recording_is_rejected() {
        assert!(matches!(
            summarize(Vec::new(), &config()),
            Err(CliError::Replay(_))
        ));
    }
}
