//! Time-series store fed by a producer.
//!
//! The consumer pulls one [`PacketBatch`](crate::producer::PacketBatch) per
//! [`update`](Consumer::update), runs every packet through the fusion
//! pipeline, and appends one value per field. The display reads the series
//! and then calls [`clear`](Consumer::clear), so the series never hold more
//! than one batch.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::packet::{Packet, PacketCodec, PacketField};
use crate::producer::Producer;

use super::apogee::Apogee;
use super::factory::{ProcessingConfig, Processors};
use super::gps::BaseCamp;
use super::orientation::Quaternion;

/// Meters to feet.
pub const METERS_TO_FEET: f64 = 3.28084;

/// Altitude converted to feet.
pub const ALTITUDE_FEET: &str = "altitude_feet";
/// Easting relative to the base camp, in meters.
pub const EASTING: &str = "easting";
/// Northing relative to the base camp, in meters.
pub const NORTHING: &str = "northing";

const DERIVED_FIELDS: [&str; 3] = [ALTITUDE_FEET, EASTING, NORTHING];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsumerError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

/// Processes producer output into named time series.
pub struct Consumer {
    producer: Arc<dyn Producer>,
    config: ProcessingConfig,
    processors: Processors,
    series: BTreeMap<&'static str, Vec<f64>>,
    has_data: bool,
    last_packet: Option<Packet>,
}

impl Consumer {
    pub fn new(producer: Arc<dyn Producer>, config: ProcessingConfig) -> Self {
        let processors = Processors::from_config(&config);
        let series = empty_series(&processors.codec);
        Self {
            producer,
            config,
            processors,
            series,
            has_data: false,
            last_packet: None,
        }
    }

    /// Drain the producer and process what it had. Returns the number of
    /// packets processed.
    pub fn update(&mut self) -> usize {
        let batch = self.producer.take_batch();

        if batch.restart {
            debug!(packets = batch.len(), "Producer restarted, rebuilding fusion state");
            self.reset();
        }

        for packet in &batch.packets {
            self.process(packet);
        }

        self.has_data = !batch.is_empty();
        batch.len()
    }

    fn process(&mut self, packet: &Packet) {
        for field in self.processors.codec.fields() {
            if let Some(values) = self.series.get_mut(field.name()) {
                values.push(field.get(packet));
            }
        }

        let altitude = f64::from(packet.altitude);
        let relative = self.processors.gps.process(
            f64::from(packet.latitude),
            f64::from(packet.longitude),
        );

        self.push(ALTITUDE_FEET, altitude * METERS_TO_FEET);
        self.push(EASTING, relative.easting);
        self.push(NORTHING, relative.northing);

        self.processors.orientation.update(packet);
        self.processors.apogee.update(packet.time_stamp, altitude);
        self.last_packet = Some(*packet);
    }

    fn push(&mut self, name: &'static str, value: f64) {
        self.series.entry(name).or_default().push(value);
    }

    fn reset(&mut self) {
        self.processors = Processors::from_config(&self.config);
        self.clear();
        self.last_packet = None;
    }

    /// Empty every series. Fusion state is kept.
    pub fn clear(&mut self) {
        for values in self.series.values_mut() {
            values.clear();
        }
    }

    /// True when the last [`update`](Self::update) processed at least one
    /// packet.
    pub fn has_data(&self) -> bool {
        self.has_data
    }

    /// Values of a field since the last [`clear`](Self::clear).
    pub fn series(&self, name: &str) -> Result<&[f64], ConsumerError> {
        self.series
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConsumerError::UnknownField(name.to_string()))
    }

    /// Codec fields in wire order, then the derived fields.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = self.processors.codec.field_names();
        names.extend(DERIVED_FIELDS);
        names
    }

    pub fn codec(&self) -> &PacketCodec {
        &self.processors.codec
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn apogee(&self) -> Option<Apogee> {
        self.processors.apogee.apogee()
    }

    pub fn orientation(&self) -> Quaternion {
        self.processors.orientation.orientation()
    }

    /// Latest temperature sample, the avionics already average it on board.
    pub fn average_temperature(&self) -> Option<f64> {
        self.series
            .get(PacketField::Temperature.name())
            .and_then(|values| values.last().copied())
    }

    /// Last valid fix in decimal degrees.
    pub fn last_gps_coordinates(&self) -> Option<(f64, f64)> {
        self.processors.gps.last_coordinates()
    }

    /// Relative eastings and northings since the last clear.
    pub fn projected_coordinates(&self) -> (&[f64], &[f64]) {
        (self.slice(EASTING), self.slice(NORTHING))
    }

    pub fn base_camp(&self) -> Option<BaseCamp> {
        self.processors.gps.base_camp()
    }

    /// Most recent packet processed, kept across clears.
    pub fn last_packet(&self) -> Option<&Packet> {
        self.last_packet.as_ref()
    }

    fn slice(&self, name: &str) -> &[f64] {
        self.series.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

fn empty_series(codec: &PacketCodec) -> BTreeMap<&'static str, Vec<f64>> {
    codec
        .field_names()
        .into_iter()
        .chain(DERIVED_FIELDS)
        .map(|name| (name, Vec::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketVersion;
    use crate::producer::PacketBatch;
    use std::sync::Mutex;

    /// Hands out queued batches one per call.
    #[derive(Default)]
    struct QueuedProducer {
        batches: Mutex<Vec<PacketBatch>>,
    }

    impl QueuedProducer {
        fn push(&self, batch: PacketBatch) {
            self.batches.lock().unwrap().insert(0, batch);
        }
    }

    impl Producer for QueuedProducer {
        fn take_batch(&self) -> PacketBatch {
            self.batches.lock().unwrap().pop().unwrap_or_default()
        }
    }

    fn config() -> ProcessingConfig {
        ProcessingConfig {
            packet_version: PacketVersion::V2018,
            sampling_frequency: 1.0,
            utm_zone: "13N".parse().unwrap(),
            gps_initialization_delay: 2.0,
            orientation_initialization_delay: 1.0,
        }
    }

    fn packet(time_stamp: u32, altitude: f32) -> Packet {
        Packet {
            time_stamp,
            latitude: 32.99,
            longitude: -106.97,
            altitude,
            temperature: 20.0 + time_stamp as f32,
            acceleration_z: 1.0,
            magnetometer_x: 0.3,
            ..Default::default()
        }
    }

    fn consumer() -> (Arc<QueuedProducer>, Consumer) {
        let producer = Arc::new(QueuedProducer::default());
        let consumer = Consumer::new(producer.clone(), config());
        (producer, consumer)
    }

    #[test]
    fn test_series_have_equal_length() {
        let (producer, mut consumer) = consumer();
        producer.push(PacketBatch::append((0..5).map(|i| packet(i, 100.0)).collect()));

        assert_eq!(consumer.update(), 5);
        assert!(consumer.has_data());
        for name in consumer.field_names() {
            assert_eq!(consumer.series(name).unwrap().len(), 5, "{}", name);
        }
    }

    #[test]
    fn test_altitude_feet() {
        let (producer, mut consumer) = consumer();
        producer.push(PacketBatch::append(vec![packet(0, 1000.0)]));
        consumer.update();

        assert_eq!(consumer.series(ALTITUDE_FEET).unwrap(), &[3280.84]);
        assert_eq!(consumer.series("altitude").unwrap(), &[1000.0]);
    }

    #[test]
    fn test_positions_are_zero_until_base_camp() {
        let (producer, mut consumer) = consumer();
        producer.push(PacketBatch::append((0..4).map(|i| packet(i, 0.0)).collect()));
        consumer.update();

        let (eastings, northings) = consumer.projected_coordinates();
        assert_eq!(&eastings[..2], &[0.0, 0.0]);
        assert_eq!(&northings[..2], &[0.0, 0.0]);
        assert!(eastings[2].abs() < 1e-6);
        assert!(consumer.base_camp().is_some());
        let (latitude, longitude) = consumer.last_gps_coordinates().unwrap();
        assert!((latitude - 32.99).abs() < 1e-4);
        assert!((longitude + 106.97).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_field() {
        let (_, consumer) = consumer();
        assert_eq!(
            consumer.series("voltage"),
            Err(ConsumerError::UnknownField("voltage".to_string()))
        );
        assert_eq!(consumer.series("temperature"), Ok(&[][..]));
    }

    #[test]
    fn test_clear_keeps_fusion_state() {
        let (producer, mut consumer) = consumer();
        producer.push(PacketBatch::append(vec![packet(0, 10.0), packet(1, 900.0)]));
        producer.push(PacketBatch::append(vec![packet(2, 50.0)]));

        assert_eq!(consumer.update(), 2);
        consumer.clear();
        for name in consumer.field_names() {
            assert!(consumer.series(name).unwrap().is_empty(), "{}", name);
        }

        consumer.update();
        assert_eq!(consumer.series("altitude").unwrap(), &[50.0]);
        assert_eq!(consumer.apogee().map(|a| a.time_stamp), Some(1));
        assert_eq!(consumer.average_temperature(), Some(22.0));
    }

    #[test]
    fn test_empty_update_has_no_data() {
        let (producer, mut consumer) = consumer();
        producer.push(PacketBatch::append(vec![packet(0, 10.0)]));

        consumer.update();
        assert!(consumer.has_data());
        assert_eq!(consumer.update(), 0);
        assert!(!consumer.has_data());
        assert_eq!(consumer.last_packet().map(|p| p.time_stamp), Some(0));
    }

    #[test]
    fn test_restart_rebuilds_fusion_state() {
        let (producer, mut consumer) = consumer();
        producer.push(PacketBatch::append(vec![
            packet(0, 10.0),
            packet(1, 900.0),
            packet(2, 40.0),
        ]));
        producer.push(PacketBatch::restart(vec![packet(0, 10.0)]));

        consumer.update();
        assert_eq!(consumer.apogee().map(|a| a.altitude), Some(900.0));

        consumer.update();
        assert_eq!(consumer.apogee().map(|a| a.altitude), Some(10.0));
        assert_eq!(consumer.series("time_stamp").unwrap(), &[0.0]);
        assert!(consumer.base_camp().is_none());
    }
}
