//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (init, path, show)
//! - [`inspect`] - One-shot flight summary of a recording
//! - [`live`] - Acquisition from the radio link
//! - [`replay`] - Timed playback of a recording
//! - [`display`] - Terminal telemetry view shared by `live` and `replay`

pub mod config;
pub mod display;
pub mod inspect;
pub mod live;
pub mod replay;

use tokio_util::sync::CancellationToken;

use crate::error::CliError;

/// Cancel `token` on Ctrl+C.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> Result<(), CliError> {
    ctrlc::set_handler(move || {
        token.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))
}
