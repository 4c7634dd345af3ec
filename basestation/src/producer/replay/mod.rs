//! Timing-accurate replay of a recorded flight.
//!
//! The producer owns the whole recording and publishes a prefix of it, the
//! *available* packets. A scheduler task steps through the recording,
//! sleeping between packets for as long as the rocket took between them,
//! scaled by the playback speed. Seeking and direction changes are applied
//! by other tasks while the scheduler runs.
//!
//! # Usage
//!
//! ```ignore
//! let producer = Arc::new(ReplayProducer::load(&CsvPersister, path, ReplayConfig::default())?);
//! let cancellation = CancellationToken::new();
//! let scheduler = producer.start(cancellation.clone());
//!
//! producer.fast_forward();
//! let batch = producer.take_batch();
//! ```

mod playback;

pub use playback::{PlaybackMode, PlaybackState, DEFAULT_MAX_SPEED};

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::packet::Packet;
use crate::persistence::{DataPersister, PersistenceError};

use super::{PacketBatch, Producer};

/// Default pause when there is nothing left to play in the current
/// direction.
pub const DEFAULT_END_OF_PLAYBACK_DELAY: Duration = Duration::from_millis(100);

/// Replay configuration.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Samples per second of the recording; one time stamp unit lasts
    /// `1 / sampling_frequency` seconds.
    pub sampling_frequency: f64,

    /// Highest speed multiplier.
    pub max_speed: u32,

    /// Scheduler pause at either end of the recording.
    pub end_of_playback_delay: Duration,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            sampling_frequency: 1.0,
            max_speed: DEFAULT_MAX_SPEED,
            end_of_playback_delay: DEFAULT_END_OF_PLAYBACK_DELAY,
        }
    }
}

impl ReplayConfig {
    /// Duration of one time stamp unit, in seconds.
    fn tick_seconds(&self) -> f64 {
        if self.sampling_frequency.is_finite() && self.sampling_frequency > 0.0 {
            1.0 / self.sampling_frequency
        } else {
            0.0
        }
    }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Recording contains no packets")]
    EmptyRecording,

    #[error("Packet index {index} is out of bounds (recording has {total} packets)")]
    IndexOutOfBounds { index: usize, total: usize },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug)]
struct ReplayData {
    /// Always `all_packets[..=index]`.
    available: Vec<Packet>,
    index: usize,
    /// Length of `available` when the consumer last took a batch.
    delivered: usize,
}

/// Plays a recording back in either direction at variable speed.
#[derive(Debug)]
pub struct ReplayProducer {
    all_packets: Vec<Packet>,
    config: ReplayConfig,
    data: Mutex<ReplayData>,
    playback: Mutex<PlaybackState>,
}

impl ReplayProducer {
    /// The replay starts positioned on the last packet with the whole
    /// flight available.
    pub fn new(packets: Vec<Packet>, config: ReplayConfig) -> Result<Self, ReplayError> {
        if packets.is_empty() {
            return Err(ReplayError::EmptyRecording);
        }

        let data = ReplayData {
            available: packets.clone(),
            index: packets.len() - 1,
            delivered: 0,
        };
        let playback = PlaybackState::new(config.max_speed);

        Ok(Self {
            all_packets: packets,
            config,
            data: Mutex::new(data),
            playback: Mutex::new(playback),
        })
    }

    /// Load a recording through a persister.
    pub fn load(
        persister: &dyn DataPersister,
        path: &Path,
        config: ReplayConfig,
    ) -> Result<Self, ReplayError> {
        let packets = persister.load(path)?;
        Self::new(packets, config)
    }

    /// Spawn the scheduler task.
    ///
    /// In forward mode the replay first rewinds to the first packet. The
    /// task runs until `cancellation` is triggered; a sleep already in
    /// progress is allowed to finish.
    pub fn start(self: &Arc<Self>, cancellation: CancellationToken) -> JoinHandle<()> {
        if self.playback_state().is_going_forward() {
            self.restart_from_beginning();
        }

        let producer = Arc::clone(self);
        tokio::spawn(async move {
            info!(
                packets = producer.total_packet_count(),
                sampling_frequency = producer.config.sampling_frequency,
                "Replay started"
            );

            while !cancellation.is_cancelled() {
                producer.update_replay().await;
            }

            info!(
                index = producer.current_packet_index(),
                "Replay stopped"
            );
        })
    }

    /// One scheduler iteration: [`step`](Self::step) then sleep for the
    /// returned duration.
    pub async fn update_replay(&self) -> Duration {
        let delay = self.step();
        tokio::time::sleep(delay).await;
        delay
    }

    /// Move one packet in the current direction and return how long to wait
    /// before the next step.
    pub fn step(&self) -> Duration {
        let playback = *self.lock_playback();
        let mut data = self.lock_data();
        let last = self.all_packets.len() - 1;

        match playback.mode() {
            PlaybackMode::Forward if data.index < last => {
                data.index += 1;
                let index = data.index;
                data.available.push(self.all_packets[index]);
                self.delay_between(index - 1, index, playback.speed())
            }
            PlaybackMode::Backward if data.index > 0 => {
                data.available.pop();
                data.index -= 1;
                let index = data.index;
                self.delay_between(index, index + 1, playback.speed())
            }
            _ => self.config.end_of_playback_delay,
        }
    }

    /// Wall-clock time between two packets at the given speed.
    fn delay_between(&self, earlier: usize, later: usize, speed: u32) -> Duration {
        let ticks = i64::from(self.all_packets[later].time_stamp)
            - i64::from(self.all_packets[earlier].time_stamp);
        if ticks <= 0 {
            return Duration::ZERO;
        }

        let seconds = ticks as f64 * self.config.tick_seconds() / f64::from(speed.max(1));
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
    }

    /// Seek so that packets `0..=index` are available.
    pub fn set_current_packet_index(&self, index: usize) -> Result<(), ReplayError> {
        let total = self.all_packets.len();
        if index >= total {
            return Err(ReplayError::IndexOutOfBounds { index, total });
        }

        let mut data = self.lock_data();
        let available = data.available.len();
        if index + 1 < available {
            data.available.truncate(index + 1);
        } else {
            data.available
                .extend_from_slice(&self.all_packets[available..=index]);
        }
        data.index = index;

        debug!(index, "Replay position changed");
        Ok(())
    }

    fn restart_from_beginning(&self) {
        let mut data = self.lock_data();
        data.available.truncate(1);
        data.index = 0;
    }

    pub fn fast_forward(&self) {
        let mut playback = self.lock_playback();
        playback.fast_forward();
        debug!(mode = %playback.mode(), speed = playback.speed(), "Fast forward");
    }

    pub fn rewind(&self) {
        let mut playback = self.lock_playback();
        playback.rewind();
        debug!(mode = %playback.mode(), speed = playback.speed(), "Rewind");
    }

    /// Current mode and speed multiplier.
    pub fn playback(&self) -> (PlaybackMode, u32) {
        let playback = self.lock_playback();
        (playback.mode(), playback.speed())
    }

    pub fn playback_state(&self) -> PlaybackState {
        *self.lock_playback()
    }

    pub fn total_packet_count(&self) -> usize {
        self.all_packets.len()
    }

    pub fn current_packet_index(&self) -> usize {
        self.lock_data().index
    }

    /// Copy of the packets played so far.
    pub fn available_packets(&self) -> Vec<Packet> {
        self.lock_data().available.clone()
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    fn lock_data(&self) -> MutexGuard<'_, ReplayData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_playback(&self) -> MutexGuard<'_, PlaybackState> {
        self.playback.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Producer for ReplayProducer {
    /// Packets made available since the previous call, or the whole
    /// available prefix as a restart if the replay moved backwards past
    /// what was already delivered.
    fn take_batch(&self) -> PacketBatch {
        let mut data = self.lock_data();
        let available = data.available.len();

        let batch = if available < data.delivered {
            PacketBatch::restart(data.available.clone())
        } else {
            PacketBatch::append(data.available[data.delivered..].to_vec())
        };

        data.delivered = available;
        batch
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Action {
        Seek(usize),
        Step,
        FastForward,
        Rewind,
        TakeBatch,
    }

    fn action(total: usize) -> impl Strategy<Value = Action> {
        prop_oneof![
            (0..total).prop_map(Action::Seek),
            Just(Action::Step),
            Just(Action::FastForward),
            Just(Action::Rewind),
            Just(Action::TakeBatch),
        ]
    }

    fn recording(total: usize) -> Vec<Packet> {
        (0..total)
            .map(|i| Packet {
                time_stamp: i as u32 * 2,
                altitude: i as f32,
                ..Default::default()
            })
            .collect()
    }

    fn scenario() -> impl Strategy<Value = (usize, Vec<Action>, usize)> {
        (1usize..30).prop_flat_map(|total| {
            (
                Just(total),
                prop::collection::vec(action(total), 0..40),
                0..total,
            )
        })
    }

    proptest! {
        /// Seeking to `k` leaves exactly the first `k + 1` packets available,
        /// whatever happened before.
        #[test]
        fn seek_exposes_prefix((total, history, target) in scenario()) {
            let all = recording(total);
            let producer = ReplayProducer::new(all.clone(), ReplayConfig::default()).unwrap();

            for action in history {
                match action {
                    Action::Seek(index) => producer.set_current_packet_index(index).unwrap(),
                    Action::Step => {
                        producer.step();
                    }
                    Action::FastForward => producer.fast_forward(),
                    Action::Rewind => producer.rewind(),
                    Action::TakeBatch => {
                        producer.take_batch();
                    }
                }
                let index = producer.current_packet_index();
                prop_assert_eq!(producer.available_packets(), all[..=index].to_vec());
            }

            producer.set_current_packet_index(target).unwrap();
            prop_assert_eq!(producer.current_packet_index(), target);
            prop_assert_eq!(producer.available_packets(), all[..=target].to_vec());
        }
    }
}
