//! Replay command - play a recorded flight back with its original timing.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use basestation::persistence::CsvPersister;
use basestation::processing::ConsumerFactory;
use basestation::producer::ReplayProducer;
use basestation::session::spawn_session;

use super::cancel_on_ctrl_c;
use super::display::TerminalSink;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the replay command.
#[derive(Debug, clap::Args)]
pub struct ReplayArgs {
    /// Recording to play back
    pub path: PathBuf,

    /// Speed multiplier, rounded up to a power of two and capped at replay.max_speed
    #[arg(long, default_value_t = 1)]
    pub speed: u32,

    /// Start at this packet index instead of the first packet
    #[arg(long)]
    pub seek: Option<usize>,

    /// Keep the session open at the end of the recording until Ctrl+C
    #[arg(long)]
    pub hold: bool,
}

/// Run the replay command.
pub async fn run(args: ReplayArgs, runner: &CliRunner) -> Result<(), CliError> {
    let config = runner.config();

    let producer = Arc::new(ReplayProducer::load(
        &CsvPersister::new(),
        &args.path,
        config.replay_config(),
    )?);
    apply_speed(&producer, args.speed);

    let consumer = ConsumerFactory::new(config.processing_config()).create(producer.clone());

    let cancellation = CancellationToken::new();
    cancel_on_ctrl_c(cancellation.clone())?;

    let scheduler = producer.start(cancellation.clone());
    if let Some(index) = args.seek {
        producer.set_current_packet_index(index)?;
    }

    let (mode, speed) = producer.playback();
    println!(
        "Replaying {} ({} packets, {} x{}, Ctrl+C to stop)",
        args.path.display(),
        producer.total_packet_count(),
        mode,
        speed
    );

    let session = spawn_session(
        consumer,
        TerminalSink::new(config.rocket.target_altitude),
        cancellation.clone(),
        config.refresh_interval(),
    );

    if args.hold {
        cancellation.cancelled().await;
    } else {
        wait_for_end(&producer, &cancellation, config.refresh_interval()).await;
    }
    cancellation.cancel();

    scheduler.await?;
    let consumer = session.await?;

    info!(
        index = producer.current_packet_index(),
        total = producer.total_packet_count(),
        "Replay finished"
    );

    println!();
    if let Some(apogee) = consumer.apogee() {
        println!(
            "Apogee: {:.1} m at time stamp {}",
            apogee.altitude, apogee.time_stamp
        );
    }

    Ok(())
}

/// Press fast forward until the replay runs at `target` or the speed stops
/// increasing.
fn apply_speed(producer: &ReplayProducer, target: u32) {
    let (_, mut speed) = producer.playback();
    while speed < target {
        producer.fast_forward();
        let (_, next) = producer.playback();
        if next == speed {
            break;
        }
        speed = next;
    }
}

/// Wait until the last packet has been delivered or the user cancels.
async fn wait_for_end(
    producer: &ReplayProducer,
    cancellation: &CancellationToken,
    poll_interval: std::time::Duration,
) {
    let last = producer.total_packet_count() - 1;
    loop {
        tokio::select! {
            _ = cancellation.cancelled() => break,
            _ = tokio::time::sleep(poll_interval) => {
                if producer.current_packet_index() >= last {
                    // One more poll so the session shows the final packet.
                    tokio::time::sleep(poll_interval).await;
                    break;
                }
            }
        }
    }
}
