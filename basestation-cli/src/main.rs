//! BaseStation CLI - Command-line interface
//!
//! Ground station for rocket telemetry: live acquisition from the radio
//! link, timed replay of recorded flights, and one-shot flight summaries.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::inspect::InspectArgs;
use commands::live::LiveArgs;
use commands::replay::ReplayArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "basestation")]
#[command(version, about = "Rocket telemetry ground station", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode telemetry from the radio link and display it
    Live(LiveArgs),

    /// Replay a recorded flight with its original timing
    Replay(ReplayArgs),

    /// Process a recording at once and print a flight summary
    Inspect(InspectArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli).await {
        e.exit();
    }
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config(command) => commands::config::run(command),
        Commands::Live(args) => {
            // Telemetry lines own stdout.
            let runner = CliRunner::new(cli.debug, false)?;
            runner.log_startup("live");
            commands::live::run(args, &runner).await
        }
        Commands::Replay(args) => {
            let runner = CliRunner::new(cli.debug, false)?;
            runner.log_startup("replay");
            commands::replay::run(args, &runner).await
        }
        Commands::Inspect(args) => {
            let runner = CliRunner::new(cli.debug, !atty::is(atty::Stream::Stdout))?;
            runner.log_startup("inspect");
            commands::inspect::run(args, &runner)
        }
    }
}
