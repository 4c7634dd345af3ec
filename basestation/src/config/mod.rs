//! Application configuration.
//!
//! Settings are read from `~/.basestation/config.ini`; a missing file means
//! defaults. Each section converts into the runtime configuration of the
//! component it drives.
//!
//! # Example
//!
//! ```ignore
//! use basestation::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let factory = ConsumerFactory::new(config.processing_config());
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::*;
