//! Raw coordinate conversion.
//!
//! The 2017 avionics forwarded the GPS receiver's NMEA values untouched,
//! so latitude and longitude arrive as `ddmm.mmmm`. Later boards convert
//! on board and send decimal degrees.

use crate::packet::PacketVersion;

/// How a version encodes latitude and longitude on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateConversion {
    /// NMEA degrees and decimal minutes (`ddmm.mmmm`).
    DegreesDecimalMinutes,
    /// Already decimal degrees.
    DecimalDegrees,
}

impl CoordinateConversion {
    pub fn for_version(version: PacketVersion) -> Self {
        match version {
            PacketVersion::V2017 => Self::DegreesDecimalMinutes,
            PacketVersion::V2018 | PacketVersion::V2019 => Self::DecimalDegrees,
        }
    }

    /// Convert one raw coordinate into decimal degrees.
    pub fn to_decimal_degrees(self, raw: f64) -> f64 {
        match self {
            Self::DecimalDegrees => raw,
            Self::DegreesDecimalMinutes => {
                let magnitude = raw.abs();
                let degrees = (magnitude / 100.0).trunc();
                let minutes = magnitude - degrees * 100.0;
                (degrees + minutes / 60.0).copysign(raw)
            }
        }
    }

    /// Convert a latitude/longitude pair.
    pub fn convert(self, latitude: f64, longitude: f64) -> (f64, f64) {
        (
            self.to_decimal_degrees(latitude),
            self.to_decimal_degrees(longitude),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_per_version() {
        assert_eq!(
            CoordinateConversion::for_version(PacketVersion::V2017),
            CoordinateConversion::DegreesDecimalMinutes
        );
        assert_eq!(
            CoordinateConversion::for_version(PacketVersion::V2019),
            CoordinateConversion::DecimalDegrees
        );
    }

    #[test]
    fn test_degrees_decimal_minutes() {
        let conversion = CoordinateConversion::DegreesDecimalMinutes;

        assert!((conversion.to_decimal_degrees(3259.4) - 32.99).abs() < 1e-9);
        assert!((conversion.to_decimal_degrees(-10658.2) - -106.97).abs() < 1e-9);
        assert_eq!(conversion.to_decimal_degrees(0.0), 0.0);
    }

    #[test]
    fn test_decimal_degrees_is_identity() {
        let conversion = CoordinateConversion::DecimalDegrees;
        assert_eq!(conversion.convert(32.99, -106.97), (32.99, -106.97));
    }
}
