//! Live command - decode telemetry from the radio link.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use basestation::packet::{PacketCodec, PacketVersion};
use basestation::persistence::CsvPersister;
use basestation::processing::ConsumerFactory;
use basestation::producer::LiveProducer;
use basestation::session::spawn_session;

use super::cancel_on_ctrl_c;
use super::display::TerminalSink;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the live command.
#[derive(Debug, clap::Args)]
pub struct LiveArgs {
    /// Byte source: the receiver's device node, a capture file, or '-' for stdin
    #[arg(long, short)]
    pub input: String,

    /// Where to save the flight (default: flight_<date>_<time>.csv)
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Discard the flight instead of saving it on exit
    #[arg(long, conflicts_with = "save")]
    pub no_save: bool,

    /// Protocol version, overriding rocket.packet_version
    #[arg(long)]
    pub packet_version: Option<u16>,
}

/// Run the live command.
pub async fn run(args: LiveArgs, runner: &CliRunner) -> Result<(), CliError> {
    let mut config = runner.config().clone();
    if let Some(number) = args.packet_version {
        config.rocket.packet_version = PacketVersion::try_from(number)?;
    }

    let source = open_input(&args.input).await?;

    let codec = PacketCodec::new(config.rocket.packet_version);
    let producer = Arc::new(LiveProducer::new(
        codec,
        config.live_config(),
        Arc::new(CsvPersister::new()),
    ));
    let consumer = ConsumerFactory::new(config.processing_config()).create(producer.clone());

    let cancellation = CancellationToken::new();
    cancel_on_ctrl_c(cancellation.clone())?;

    println!(
        "Receiving {} telemetry from {} (Ctrl+C to stop)",
        codec.version(),
        args.input
    );

    let mut acquisition = producer.start(source, cancellation.child_token());
    let session = spawn_session(
        consumer,
        TerminalSink::new(config.rocket.target_altitude),
        cancellation.clone(),
        config.refresh_interval(),
    );

    let finished = tokio::select! {
        result = &mut acquisition => Some(result),
        _ = cancellation.cancelled() => None,
    };
    cancellation.cancel();

    let acquisition_result = match finished {
        Some(result) => result,
        None => acquisition.await,
    };
    let consumer = session.await?;

    let stats = producer.scan_stats();
    info!(
        packets = producer.packet_count(),
        rejected = stats.frames_rejected,
        bytes_skipped = stats.bytes_skipped,
        "Live acquisition finished"
    );

    println!();
    println!("Received {} packets", producer.packet_count());
    if let Some(apogee) = consumer.apogee() {
        println!(
            "Apogee: {:.1} m at time stamp {}",
            apogee.altitude, apogee.time_stamp
        );
    }

    // Saved even when the read failed.
    if !args.no_save && producer.has_unsaved_data() {
        let path = args.save.clone().unwrap_or_else(default_save_path);
        save_flight(&producer, &path)?;
    }

    acquisition_result??;
    Ok(())
}

async fn open_input(input: &str) -> Result<Box<dyn AsyncRead + Unpin + Send>, CliError> {
    if input == "-" {
        return Ok(Box::new(tokio::io::stdin()));
    }

    let file = tokio::fs::File::open(input)
        .await
        .map_err(|error| CliError::Input {
            path: input.to_string(),
            error,
        })?;
    Ok(Box::new(file))
}

fn save_flight(producer: &LiveProducer, path: &Path) -> Result<(), CliError> {
    match producer.save(path) {
        Ok(()) => {
            println!("Flight saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to save flight");
            Err(e.into())
        }
    }
}

/// `flight_<date>_<time>.csv` in the working directory.
fn default_save_path() -> PathBuf {
    PathBuf::from(
        chrono::Local::now()
            .format("flight_%Y-%m-%d_%Hh%Mm.csv")
            .to_string(),
    )
}
