//! Display refresh loop.
//!
//! A session periodically drains the consumer, condenses what it received
//! into a [`TelemetrySnapshot`] and hands it to a [`TelemetrySink`], then
//! clears the consumer for the next round.
//!
//! # Usage
//!
//! ```ignore
//! let cancellation = CancellationToken::new();
//! let handle = spawn_session(consumer, sink, cancellation.clone(), Duration::from_millis(100));
//!
//! cancellation.cancel();
//! let consumer = handle.await?;
//! ```

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::processing::{Apogee, Consumer, Quaternion, ALTITUDE_FEET};

/// Default refresh interval (10 Hz).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Shortest refresh interval the loop runs at.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

/// State of the flight after the latest batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Packets processed in this refresh.
    pub packets: usize,
    pub time_stamp: u32,
    pub altitude_feet: f64,
    /// Meters east of the base camp.
    pub easting: f64,
    /// Meters north of the base camp.
    pub northing: f64,
    pub orientation: Quaternion,
    pub apogee: Option<Apogee>,
    pub temperature: Option<f64>,
    pub gps_coordinates: Option<(f64, f64)>,
    pub voltage: f64,
    /// Acquisition boards 1 to 3, power supplies 1 and 2, payload board.
    pub board_states: [bool; 6],
}

impl TelemetrySnapshot {
    /// Summarize the consumer's current batch, `None` if it is empty.
    pub fn from_consumer(consumer: &Consumer) -> Option<Self> {
        let packet = consumer.last_packet()?;
        let altitude = consumer.series(ALTITUDE_FEET).ok()?;
        let (eastings, northings) = consumer.projected_coordinates();

        Some(Self {
            packets: altitude.len(),
            time_stamp: packet.time_stamp,
            altitude_feet: *altitude.last()?,
            easting: eastings.last().copied().unwrap_or_default(),
            northing: northings.last().copied().unwrap_or_default(),
            orientation: consumer.orientation(),
            apogee: consumer.apogee(),
            temperature: consumer.average_temperature(),
            gps_coordinates: consumer.last_gps_coordinates(),
            voltage: f64::from(packet.voltage),
            board_states: [
                packet.acquisition_board_state_1,
                packet.acquisition_board_state_2,
                packet.acquisition_board_state_3,
                packet.power_supply_state_1,
                packet.power_supply_state_2,
                packet.payload_board_state_1,
            ],
        })
    }
}

/// Receives snapshots, e.g. a terminal or GUI view.
pub trait TelemetrySink: Send {
    fn render(&mut self, snapshot: &TelemetrySnapshot);
}

/// Run one refresh. Returns true if the sink was called.
pub fn refresh<S: TelemetrySink + ?Sized>(consumer: &mut Consumer, sink: &mut S) -> bool {
    consumer.update();
    let rendered = match consumer
        .has_data()
        .then(|| TelemetrySnapshot::from_consumer(consumer))
        .flatten()
    {
        Some(snapshot) => {
            sink.render(&snapshot);
            true
        }
        None => false,
    };
    consumer.clear();
    rendered
}

/// Spawn the refresh loop. The consumer is handed back when the task ends.
pub fn spawn_session<S>(
    mut consumer: Consumer,
    mut sink: S,
    cancellation: CancellationToken,
    interval: Duration,
) -> JoinHandle<Consumer>
where
    S: TelemetrySink + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(MIN_REFRESH_INTERVAL));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut refreshes: u64 = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if refresh(&mut consumer, &mut sink) {
                        refreshes += 1;
                    }
                }
                _ = cancellation.cancelled() => {
                    // Pick up whatever arrived since the last tick.
                    refresh(&mut consumer, &mut sink);
                    debug!(refreshes, "Session stopped");
                    break;
                }
            }
        }

        consumer
    })
}
