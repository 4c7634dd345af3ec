//! Configuration management CLI commands.
//!
//! Provides `config init`, `config path` and `config show`.

use clap::Subcommand;
use basestation::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { force } => run_init(force),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
    }
}

fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();

    let written = if force {
        ConfigFile::default().save_to(&path)?;
        true
    } else {
        ConfigFile::ensure_exists_at(&path)?
    };

    if written {
        println!("Wrote default configuration to {}", path.display());
    } else {
        println!(
            "Configuration already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    Ok(())
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Missing keys show their defaults, so this is what a command would run with.
fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    print!("{}", config.to_ini_string());
    Ok(())
}
