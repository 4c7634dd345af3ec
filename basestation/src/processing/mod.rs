//! Sensor fusion: from raw packets to flight quantities.
//!
//! # Components
//!
//! - [`gps`] - Launch-relative ground track
//! - [`orientation`] - Attitude quaternion
//! - [`ApogeeCalculator`] - Highest altitude reached
//! - [`Consumer`] - Time series for display, fed by a producer
//! - [`ConsumerFactory`] - Builds consumers for a rocket configuration
//!
//! # Usage
//!
//! ```ignore
//! let factory = ConsumerFactory::new(ProcessingConfig::default());
//! let mut consumer = factory.create(producer);
//!
//! consumer.update();
//! let altitudes = consumer.series(ALTITUDE_FEET)?;
//! consumer.clear();
//! ```

mod apogee;
mod consumer;
mod factory;
pub mod gps;
pub mod orientation;

pub use apogee::{Apogee, ApogeeCalculator};
pub use consumer::{Consumer, ConsumerError, ALTITUDE_FEET, EASTING, METERS_TO_FEET, NORTHING};
pub use factory::{ConsumerFactory, ProcessingConfig, Processors};
pub use gps::{BaseCamp, UtmZone};
pub use orientation::Quaternion;
