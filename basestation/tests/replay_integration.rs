//! Integration tests for flight replay.
//!
//! A recording is written to disk, loaded back into a replay producer and
//! played on a paused clock, so wall-clock timing is deterministic:
//! - Loading recordings through the persister
//! - Timed delivery at normal and increased speed
//! - Rewind, which makes the consumer start over
//! - Seeking

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use basestation::packet::{Packet, PacketCodec, PacketVersion};
use basestation::persistence::{CsvPersister, DataPersister};
use basestation::processing::{ConsumerFactory, ProcessingConfig, ALTITUDE_FEET};
use basestation::producer::{PlaybackMode, ReplayConfig, ReplayError, ReplayProducer};

// =============================================================================
// Test Helpers
// =============================================================================

const VERSION: PacketVersion = PacketVersion::V2018;

/// Ten packets, one per second, climbing 100 m each.
fn recording() -> Vec<Packet> {
    (0..10)
        .map(|i| Packet {
            time_stamp: i,
            latitude: 32.99,
            longitude: -106.97,
            altitude: i as f32 * 100.0,
            acceleration_z: 1.0,
            ..Default::default()
        })
        .collect()
}

fn write_recording(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("flight.csv");
    CsvPersister::new()
        .save(&path, &recording(), &PacketCodec::new(VERSION))
        .unwrap();
    path
}

fn processing_config() -> ProcessingConfig {
    ProcessingConfig {
        packet_version: VERSION,
        sampling_frequency: 1.0,
        gps_initialization_delay: 2.0,
        orientation_initialization_delay: 2.0,
        ..Default::default()
    }
}

fn load(path: &Path) -> Arc<ReplayProducer> {
    let config = ReplayConfig {
        sampling_frequency: 1.0,
        ..Default::default()
    };
    Arc::new(ReplayProducer::load(&CsvPersister::new(), path, config).unwrap())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_replay_delivers_packets_with_recorded_timing() {
    let dir = tempfile::TempDir::new().unwrap();
    let producer = load(&write_recording(dir.path()));
    let mut consumer = ConsumerFactory::new(processing_config()).create(producer.clone());

    let cancellation = CancellationToken::new();
    let scheduler = producer.start(cancellation.clone());

    // The first step runs immediately: packets 0 and 1.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(consumer.update(), 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(consumer.update(), 2);
    assert_eq!(producer.current_packet_index(), 3);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(consumer.update(), 6);
    assert_eq!(producer.current_packet_index(), 9);

    let apogee = consumer.apogee().unwrap();
    assert_eq!(apogee.time_stamp, 9);
    assert_eq!(apogee.altitude, 900.0);
    assert!(consumer.base_camp().is_some());

    cancellation.cancel();
    scheduler.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_fast_forward_shortens_delays() {
    let dir = tempfile::TempDir::new().unwrap();
    let producer = load(&write_recording(dir.path()));
    producer.fast_forward();
    producer.fast_forward();
    assert_eq!(producer.playback(), (PlaybackMode::Forward, 4));

    let cancellation = CancellationToken::new();
    let scheduler = producer.start(cancellation.clone());

    // Steps at 0, 0.25, 0.5 and 0.75 s.
    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(producer.current_packet_index(), 4);

    cancellation.cancel();
    scheduler.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_rewind_restarts_consumer() {
    let dir = tempfile::TempDir::new().unwrap();
    let producer = load(&write_recording(dir.path()));
    let mut consumer = ConsumerFactory::new(processing_config()).create(producer.clone());

    let cancellation = CancellationToken::new();
    let scheduler = producer.start(cancellation.clone());

    tokio::time::sleep(Duration::from_millis(4500)).await;
    assert_eq!(consumer.update(), 6);
    consumer.clear();

    producer.rewind();
    assert_eq!(producer.playback(), (PlaybackMode::Backward, 1));

    // The pending step at 5 s moves back to index 4.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(producer.current_packet_index(), 4);

    assert_eq!(consumer.update(), 5);
    let altitude = consumer.series(ALTITUDE_FEET).unwrap();
    assert_eq!(altitude.len(), 5);
    assert_eq!(consumer.apogee().map(|a| a.time_stamp), Some(4));

    cancellation.cancel();
    scheduler.await.unwrap();
}

#[test]
fn test_seek_and_bounds() {
    let dir = tempfile::TempDir::new().unwrap();
    let producer = load(&write_recording(dir.path()));
    let mut consumer = ConsumerFactory::new(processing_config()).create(producer.clone());

    // A freshly loaded replay exposes the whole flight.
    assert_eq!(producer.total_packet_count(), 10);
    assert_eq!(producer.current_packet_index(), 9);
    assert_eq!(consumer.update(), 10);

    producer.set_current_packet_index(2).unwrap();
    assert_eq!(consumer.update(), 3);
    assert_eq!(consumer.last_packet().map(|p| p.time_stamp), Some(2));

    producer.set_current_packet_index(6).unwrap();
    assert_eq!(consumer.update(), 4);

    assert!(matches!(
        producer.set_current_packet_index(10),
        Err(ReplayError::IndexOutOfBounds {
            index: 10,
            total: 10
        })
    ));
}

#[test]
fn test_empty_recording_cannot_be_replayed() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    CsvPersister::new()
        .save(&path, &[], &PacketCodec::new(VERSION))
        .unwrap();

    let result = ReplayProducer::load(&CsvPersister::new(), &path, ReplayConfig::default());
    assert!(matches!(result, Err(ReplayError::EmptyRecording)));
}
