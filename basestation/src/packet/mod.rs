//! Rocket telemetry packets and their wire codecs.
//!
//! A [`Packet`] is the decoded form of one radio frame. Which fields are
//! meaningful depends on the protocol version the rocket was flown with;
//! fields a version does not carry stay at zero.
//!
//! # Components
//!
//! - [`PacketField`] - Named, ordered field identifiers with `f64` access
//! - [`PacketCodec`] - Per-version binary layout (see [`PacketVersion`])
//! - [`checksum`] - Trailing sum-of-bytes frame checksum
//! - [`FrameScanner`] - Byte-stream framing with resynchronisation
//!
//! # Example
//!
//! ```
//! use basestation::packet::{Packet, PacketCodec, PacketVersion};
//!
//! let codec = PacketCodec::new(PacketVersion::V2018);
//! let packet = Packet {
//!     time_stamp: 42,
//!     altitude: 1250.0,
//!     ..Default::default()
//! };
//!
//! let frame = codec.encode_frame(&packet);
//! assert_eq!(frame.len(), codec.frame_size());
//! ```

pub mod checksum;
mod codec;
mod error;
mod scanner;

pub use codec::{PacketCodec, PacketVersion, WireType};
pub use error::PacketError;
pub use scanner::{FrameScanner, ScanStats};

/// One decoded telemetry sample.
///
/// Units: degrees for coordinates, meters for altitude, g for acceleration,
/// gauss for the magnetometer, degrees per second for angular speed,
/// degrees Celsius for temperature and volts for the supply voltage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Packet {
    /// Sample counter, one tick per sampling period.
    pub time_stamp: u32,
    pub latitude: f32,
    pub longitude: f32,
    pub altitude: f32,
    pub temperature: f32,
    pub acceleration_x: f32,
    pub acceleration_y: f32,
    pub acceleration_z: f32,
    pub magnetometer_x: f32,
    pub magnetometer_y: f32,
    pub magnetometer_z: f32,
    pub angular_speed_x: f32,
    pub angular_speed_y: f32,
    pub angular_speed_z: f32,
    pub acquisition_board_state_1: bool,
    pub acquisition_board_state_2: bool,
    pub acquisition_board_state_3: bool,
    pub power_supply_state_1: bool,
    pub power_supply_state_2: bool,
    pub payload_board_state_1: bool,
    pub voltage: f32,
}

/// Identifier of a single packet field.
///
/// The declaration order is the canonical order used by every codec: a
/// version's layout is always a prefix-compatible subsequence of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PacketField {
    TimeStamp,
    Latitude,
    Longitude,
    Altitude,
    Temperature,
    AccelerationX,
    AccelerationY,
    AccelerationZ,
    MagnetometerX,
    MagnetometerY,
    MagnetometerZ,
    AngularSpeedX,
    AngularSpeedY,
    AngularSpeedZ,
    AcquisitionBoardState1,
    AcquisitionBoardState2,
    AcquisitionBoardState3,
    PowerSupplyState1,
    PowerSupplyState2,
    PayloadBoardState1,
    Voltage,
}

impl PacketField {
    /// Every field, in canonical order.
    pub const ALL: [PacketField; 21] = [
        PacketField::TimeStamp,
        PacketField::Latitude,
        PacketField::Longitude,
        PacketField::Altitude,
        PacketField::Temperature,
        PacketField::AccelerationX,
        PacketField::AccelerationY,
        PacketField::AccelerationZ,
        PacketField::MagnetometerX,
        PacketField::MagnetometerY,
        PacketField::MagnetometerZ,
        PacketField::AngularSpeedX,
        PacketField::AngularSpeedY,
        PacketField::AngularSpeedZ,
        PacketField::AcquisitionBoardState1,
        PacketField::AcquisitionBoardState2,
        PacketField::AcquisitionBoardState3,
        PacketField::PowerSupplyState1,
        PacketField::PowerSupplyState2,
        PacketField::PayloadBoardState1,
        PacketField::Voltage,
    ];

    /// The field's name as used in time series and CSV headers.
    pub fn name(self) -> &'static str {
        match self {
            Self::TimeStamp => "time_stamp",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Altitude => "altitude",
            Self::Temperature => "temperature",
            Self::AccelerationX => "acceleration_x",
            Self::AccelerationY => "acceleration_y",
            Self::AccelerationZ => "acceleration_z",
            Self::MagnetometerX => "magnetometer_x",
            Self::MagnetometerY => "magnetometer_y",
            Self::MagnetometerZ => "magnetometer_z",
            Self::AngularSpeedX => "angular_speed_x",
            Self::AngularSpeedY => "angular_speed_y",
            Self::AngularSpeedZ => "angular_speed_z",
            Self::AcquisitionBoardState1 => "acquisition_board_state_1",
            Self::AcquisitionBoardState2 => "acquisition_board_state_2",
            Self::AcquisitionBoardState3 => "acquisition_board_state_3",
            Self::PowerSupplyState1 => "power_supply_state_1",
            Self::PowerSupplyState2 => "power_supply_state_2",
            Self::PayloadBoardState1 => "payload_board_state_1",
            Self::Voltage => "voltage",
        }
    }

    /// Look a field up by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }

    /// Read the field from a packet, widened to `f64`.
    ///
    /// Flags read as `0.0` / `1.0`.
    pub fn get(self, packet: &Packet) -> f64 {
        match self {
            Self::TimeStamp => f64::from(packet.time_stamp),
            Self::Latitude => f64::from(packet.latitude),
            Self::Longitude => f64::from(packet.longitude),
            Self::Altitude => f64::from(packet.altitude),
            Self::Temperature => f64::from(packet.temperature),
            Self::AccelerationX => f64::from(packet.acceleration_x),
            Self::AccelerationY => f64::from(packet.acceleration_y),
            Self::AccelerationZ => f64::from(packet.acceleration_z),
            Self::MagnetometerX => f64::from(packet.magnetometer_x),
            Self::MagnetometerY => f64::from(packet.magnetometer_y),
            Self::MagnetometerZ => f64::from(packet.magnetometer_z),
            Self::AngularSpeedX => f64::from(packet.angular_speed_x),
            Self::AngularSpeedY => f64::from(packet.angular_speed_y),
            Self::AngularSpeedZ => f64::from(packet.angular_speed_z),
            Self::AcquisitionBoardState1 => flag(packet.acquisition_board_state_1),
            Self::AcquisitionBoardState2 => flag(packet.acquisition_board_state_2),
            Self::AcquisitionBoardState3 => flag(packet.acquisition_board_state_3),
            Self::PowerSupplyState1 => flag(packet.power_supply_state_1),
            Self::PowerSupplyState2 => flag(packet.power_supply_state_2),
            Self::PayloadBoardState1 => flag(packet.payload_board_state_1),
            Self::Voltage => f64::from(packet.voltage),
        }
    }

    /// Write the field into a packet, narrowing from `f64`.
    ///
    /// Any non-zero value sets a flag.
    pub fn set(self, packet: &mut Packet, value: f64) {
        let narrow = value as f32;
        match self {
            Self::TimeStamp => packet.time_stamp = value as u32,
            Self::Latitude => packet.latitude = narrow,
            Self::Longitude => packet.longitude = narrow,
            Self::Altitude => packet.altitude = narrow,
            Self::Temperature => packet.temperature = narrow,
            Self::AccelerationX => packet.acceleration_x = narrow,
            Self::AccelerationY => packet.acceleration_y = narrow,
            Self::AccelerationZ => packet.acceleration_z = narrow,
            Self::MagnetometerX => packet.magnetometer_x = narrow,
            Self::MagnetometerY => packet.magnetometer_y = narrow,
            Self::MagnetometerZ => packet.magnetometer_z = narrow,
            Self::AngularSpeedX => packet.angular_speed_x = narrow,
            Self::AngularSpeedY => packet.angular_speed_y = narrow,
            Self::AngularSpeedZ => packet.angular_speed_z = narrow,
            Self::AcquisitionBoardState1 => packet.acquisition_board_state_1 = value != 0.0,
            Self::AcquisitionBoardState2 => packet.acquisition_board_state_2 = value != 0.0,
            Self::AcquisitionBoardState3 => packet.acquisition_board_state_3 = value != 0.0,
            Self::PowerSupplyState1 => packet.power_supply_state_1 = value != 0.0,
            Self::PowerSupplyState2 => packet.power_supply_state_2 = value != 0.0,
            Self::PayloadBoardState1 => packet.payload_board_state_1 = value != 0.0,
            Self::Voltage => packet.voltage = narrow,
        }
    }
}

impl std::fmt::Display for PacketField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
