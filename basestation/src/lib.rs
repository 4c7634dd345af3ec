//! BaseStation - ground-station backend for rocket telemetry
//!
//! This library decodes the binary packet stream sent by the rocket's
//! avionics, fuses it into flight quantities (ground track relative to the
//! launch site, attitude, apogee), and feeds a display either live from the
//! radio link or from a recorded flight replayed with its original timing.
//!
//! # Modules
//!
//! - [`packet`] - Versioned wire codecs, checksum, stream framing
//! - [`processing`] - Fusion pipeline and the time-series consumer
//! - [`producer`] - Live and replay packet sources
//! - [`persistence`] - CSV flight recordings
//! - [`session`] - Display refresh loop
//! - [`config`] - `~/.basestation/config.ini`
//! - [`logging`] - Tracing subscriber setup
//!
//! # Example
//!
//! ```ignore
//! use basestation::config::ConfigFile;
//! use basestation::processing::ConsumerFactory;
//! use basestation::producer::ReplayProducer;
//!
//! let config = ConfigFile::load()?;
//! let producer = Arc::new(ReplayProducer::load(&CsvPersister, path, config.replay_config())?);
//! let mut consumer = ConsumerFactory::new(config.processing_config()).create(producer.clone());
//!
//! consumer.update();
//! println!("apogee: {:?}", consumer.apogee());
//! ```

pub mod config;
pub mod logging;
pub mod packet;
pub mod persistence;
pub mod processing;
pub mod producer;
pub mod session;

/// Version of the BaseStation library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
