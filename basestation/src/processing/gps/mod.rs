//! GPS fusion: raw coordinates to positions relative to the launch site.
//!
//! # Components
//!
//! - [`CoordinateConversion`] - Wire coordinate encoding per version
//! - [`FixValidator`] - Rejects unusable fixes
//! - [`UtmConverter`] - WGS84 to UTM projection
//! - [`BaseCampInitializer`] - Resolves the launch site
//! - [`GpsProcessor`] - Chains the above for one packet at a time

mod conversion;
mod fix;
mod initializer;
mod utm;

pub use conversion::CoordinateConversion;
pub use fix::FixValidator;
pub use initializer::{window_samples, BaseCamp, BaseCampInitializer};
pub use utm::{Hemisphere, PlanarPosition, UtmConverter, UtmZone, ZoneError};

use crate::packet::PacketVersion;

/// Per-packet GPS pipeline.
#[derive(Debug, Clone)]
pub struct GpsProcessor {
    conversion: CoordinateConversion,
    validator: FixValidator,
    converter: UtmConverter,
    initializer: BaseCampInitializer,
    last_relative: PlanarPosition,
    last_coordinates: Option<(f64, f64)>,
}

impl GpsProcessor {
    pub fn new(
        version: PacketVersion,
        zone: UtmZone,
        initialization_delay: f64,
        sampling_frequency: f64,
    ) -> Self {
        Self::with_components(
            CoordinateConversion::for_version(version),
            FixValidator::for_version(version),
            UtmConverter::new(zone),
            BaseCampInitializer::new(initialization_delay, sampling_frequency),
        )
    }

    pub fn with_components(
        conversion: CoordinateConversion,
        validator: FixValidator,
        converter: UtmConverter,
        initializer: BaseCampInitializer,
    ) -> Self {
        Self {
            conversion,
            validator,
            converter,
            initializer,
            last_relative: PlanarPosition::default(),
            last_coordinates: None,
        }
    }

    /// Process one raw coordinate pair and return the position relative to
    /// the base camp, in meters.
    ///
    /// The origin is returned until the base camp is known. Once it is, an
    /// invalid fix repeats the previous relative position.
    pub fn process(&mut self, raw_latitude: f64, raw_longitude: f64) -> PlanarPosition {
        let (latitude, longitude) = self.conversion.convert(raw_latitude, raw_longitude);

        let projected = if self.validator.is_valid(latitude, longitude) {
            self.last_coordinates = Some((latitude, longitude));
            Some(self.converter.project(latitude, longitude))
        } else {
            None
        };

        let relative = match (self.initializer.observe(projected), projected) {
            (Some(base_camp), Some(position)) => PlanarPosition {
                easting: position.easting - base_camp.easting,
                northing: position.northing - base_camp.northing,
            },
            (Some(_), None) => self.last_relative,
            (None, _) => PlanarPosition::default(),
        };

        self.last_relative = relative;
        relative
    }

    pub fn base_camp(&self) -> Option<BaseCamp> {
        self.initializer.base_camp()
    }

    pub fn is_initialized(&self) -> bool {
        self.initializer.is_initialized()
    }

    /// Last valid fix in decimal degrees.
    pub fn last_coordinates(&self) -> Option<(f64, f64)> {
        self.last_coordinates
    }

    pub fn zone(&self) -> UtmZone {
        self.converter.zone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAT: f64 = 32.99;
    const LON: f64 = -106.97;

    fn processor(window: usize) -> GpsProcessor {
        GpsProcessor::with_components(
            CoordinateConversion::DecimalDegrees,
            FixValidator::CoordinateSanity,
            UtmConverter::new("13N".parse().unwrap()),
            BaseCampInitializer::with_window(window),
        )
    }

    #[test]
    fn test_origin_until_base_camp_resolved() {
        let mut gps = processor(3);

        for _ in 0..3 {
            assert_eq!(gps.process(LAT, LON), PlanarPosition::default());
        }
        assert!(!gps.is_initialized());

        let relative = gps.process(LAT, LON);
        assert!(gps.is_initialized());
        assert!(relative.easting.abs() < 1e-6);
        assert!(relative.northing.abs() < 1e-6);
    }

    #[test]
    fn test_relative_position_after_initialization() {
        let mut gps = processor(2);
        gps.process(LAT, LON);
        gps.process(LAT, LON);

        let base_camp = gps.base_camp();
        let north = gps.process(LAT + 0.01, LON);

        assert!(base_camp.is_none());
        // Grid north differs from true north by the meridian convergence.
        assert!((north.easting - 20.77).abs() < 0.05);
        assert!((north.northing - 1108.87).abs() < 0.05);
    }

    #[test]
    fn test_invalid_fix_repeats_last_relative_position() {
        let mut gps = processor(1);
        gps.process(LAT, LON);

        let moved = gps.process(LAT + 0.001, LON + 0.001);
        assert_eq!(gps.process(0.0, 0.0), moved);
        assert_eq!(gps.process(f64::NAN, LON), moved);
        assert_eq!(gps.last_coordinates(), Some((LAT + 0.001, LON + 0.001)));
    }

    #[test]
    fn test_nmea_coordinates_for_2017() {
        let mut nmea = GpsProcessor::new(PacketVersion::V2017, "13N".parse().unwrap(), 1.0, 1.0);
        let mut decimal = GpsProcessor::new(PacketVersion::V2018, "13N".parse().unwrap(), 1.0, 1.0);

        nmea.process(3259.4, -10658.2);
        decimal.process(LAT, LON);

        let a = nmea.base_camp();
        let b = decimal.base_camp();
        assert_eq!(a.is_some(), b.is_some());

        nmea.process(3259.4, -10658.2);
        decimal.process(LAT, LON);
        let a = nmea.base_camp().unwrap();
        let b = decimal.base_camp().unwrap();
        assert!((a.easting - b.easting).abs() < 1e-3);
        assert!((a.northing - b.northing).abs() < 1e-3);
    }
}
