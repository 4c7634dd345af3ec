//! Assembly of the fusion pipeline for a rocket configuration.

use std::sync::Arc;

use crate::packet::{PacketCodec, PacketVersion};
use crate::producer::Producer;

use super::apogee::ApogeeCalculator;
use super::consumer::Consumer;
use super::gps::{window_samples, GpsProcessor, UtmZone};
use super::orientation::{AngularSpeedIntegrator, OrientationInitializer, OrientationProcessor};

/// Rocket and site parameters the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingConfig {
    pub packet_version: PacketVersion,
    /// Samples per second; one time stamp tick lasts `1 / sampling_frequency`.
    pub sampling_frequency: f64,
    pub utm_zone: UtmZone,
    /// Seconds of pad data used to locate the base camp.
    pub gps_initialization_delay: f64,
    /// Seconds of pad data used to find the resting attitude.
    pub orientation_initialization_delay: f64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            packet_version: PacketVersion::V2019,
            sampling_frequency: 1.0,
            utm_zone: UtmZone::default(),
            gps_initialization_delay: 10.0,
            orientation_initialization_delay: 10.0,
        }
    }
}

/// Stateful fusion components, rebuilt whenever processing starts over.
#[derive(Debug, Clone)]
pub struct Processors {
    pub codec: PacketCodec,
    pub gps: GpsProcessor,
    pub orientation: OrientationProcessor,
    pub apogee: ApogeeCalculator,
}

impl Processors {
    pub fn from_config(config: &ProcessingConfig) -> Self {
        let version = config.packet_version;
        let orientation_window = window_samples(
            config.orientation_initialization_delay,
            config.sampling_frequency,
        );

        Self {
            codec: PacketCodec::new(version),
            gps: GpsProcessor::new(
                version,
                config.utm_zone,
                config.gps_initialization_delay,
                config.sampling_frequency,
            ),
            orientation: OrientationProcessor::new(
                OrientationInitializer::new(orientation_window),
                AngularSpeedIntegrator::new(config.sampling_frequency),
            ),
            apogee: ApogeeCalculator::new(),
        }
    }
}

/// Builds consumers wired for one rocket configuration.
#[derive(Debug, Clone)]
pub struct ConsumerFactory {
    config: ProcessingConfig,
}

impl ConsumerFactory {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn create(&self, producer: Arc<dyn Producer>) -> Consumer {
        Consumer::new(producer, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::PacketBatch;

    struct NoPackets;

    impl Producer for NoPackets {
        fn take_batch(&self) -> PacketBatch {
            PacketBatch::default()
        }
    }

    #[test]
    fn test_codec_follows_version() {
        let config = ProcessingConfig {
            packet_version: PacketVersion::V2017,
            ..Default::default()
        };
        let consumer = ConsumerFactory::new(config).create(Arc::new(NoPackets));

        assert_eq!(consumer.codec().version(), PacketVersion::V2017);
        assert!(consumer.field_names().contains(&"altitude_feet"));
        assert!(!consumer.field_names().contains(&"temperature"));
    }

    #[test]
    fn test_gps_zone_follows_config() {
        let config = ProcessingConfig {
            utm_zone: "56S".parse().unwrap(),
            ..Default::default()
        };
        let processors = Processors::from_config(&config);
        assert_eq!(processors.gps.zone().to_string(), "56S");
        assert!(!processors.orientation.is_initialized());
    }
}
