//! Versioned binary layouts.
//!
//! Frames carry no header or version tag: the version is chosen out of band
//! (configuration) and the codec trusts it. All multi-byte values are
//! little-endian and fields are packed with no padding.
//!
//! | Version | Payload | Fields |
//! |---------|---------|--------|
//! | 2017 | 16 B | `time_stamp: u32`, `latitude`, `longitude`, `altitude: f32` (NMEA `ddmm.mmmm` coordinates) |
//! | 2018 | 56 B | 2017 fields (decimal degrees), then `temperature`, `acceleration_{x,y,z}`, `magnetometer_{x,y,z}`, `angular_speed_{x,y,z}: f32` |
//! | 2019 | 66 B | 2018 fields, then six board-state flags (`u8`), then `voltage: f32` |

use super::checksum;
use super::{Packet, PacketError, PacketField};

const V2017_FIELDS: &[PacketField] = &[
    PacketField::TimeStamp,
    PacketField::Latitude,
    PacketField::Longitude,
    PacketField::Altitude,
];

const V2018_FIELDS: &[PacketField] = &[
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
];

const V2019_FIELDS: &[PacketField] = &[
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

/// Protocol version flown by the rocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketVersion {
    /// Position-only frames from the 2017 avionics.
    V2017,
    /// Adds the IMU (accelerometer, magnetometer, gyroscope) and temperature.
    V2018,
    /// Adds board health flags and the supply voltage.
    V2019,
}

impl PacketVersion {
    /// Every supported version, oldest first.
    pub const ALL: [PacketVersion; 3] = [Self::V2017, Self::V2018, Self::V2019];

    /// The version's year number, as written in configuration.
    pub fn number(self) -> u16 {
        match self {
            Self::V2017 => 2017,
            Self::V2018 => 2018,
            Self::V2019 => 2019,
        }
    }

    /// Fields carried on the wire, in wire order.
    pub fn fields(self) -> &'static [PacketField] {
        match self {
            Self::V2017 => V2017_FIELDS,
            Self::V2018 => V2018_FIELDS,
            Self::V2019 => V2019_FIELDS,
        }
    }
}

impl TryFrom<u16> for PacketVersion {
    type Error = PacketError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|version| version.number() == value)
            .ok_or(PacketError::UnsupportedVersion(value))
    }
}

impl std::fmt::Display for PacketVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// On-wire representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    U32,
    F32,
    /// One byte, zero is false.
    Flag,
}

impl WireType {
    /// Encoded width in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::U32 | Self::F32 => 4,
            Self::Flag => 1,
        }
    }

    fn of(field: PacketField) -> Self {
        match field {
            PacketField::TimeStamp => Self::U32,
            PacketField::AcquisitionBoardState1
            | PacketField::AcquisitionBoardState2
            | PacketField::AcquisitionBoardState3
            | PacketField::PowerSupplyState1
            | PacketField::PowerSupplyState2
            | PacketField::PayloadBoardState1 => Self::Flag,
            _ => Self::F32,
        }
    }
}

fn word(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

/// Encoder/decoder for one protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketCodec {
    version: PacketVersion,
    payload_size: usize,
}

impl PacketCodec {
    /// Create the codec for a version.
    pub fn new(version: PacketVersion) -> Self {
        let payload_size = version
            .fields()
            .iter()
            .map(|field| WireType::of(*field).size())
            .sum();
        Self {
            version,
            payload_size,
        }
    }

    pub fn version(&self) -> PacketVersion {
        self.version
    }

    /// Fields this version carries, in wire order.
    pub fn fields(&self) -> &'static [PacketField] {
        self.version.fields()
    }

    /// Field names, in wire order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(|field| field.name()).collect()
    }

    /// Payload size in bytes, without the checksum trailer.
    pub fn payload_size(&self) -> usize {
        self.payload_size
    }

    /// Full frame size in bytes: payload plus the checksum trailer.
    pub fn frame_size(&self) -> usize {
        self.payload_size + 1
    }

    /// Decode a payload (frame without its checksum trailer).
    pub fn parse(&self, payload: &[u8]) -> Result<Packet, PacketError> {
        if payload.len() != self.payload_size {
            return Err(PacketError::LengthMismatch {
                expected: self.payload_size,
                actual: payload.len(),
            });
        }

        let mut packet = Packet::default();
        let mut offset = 0;
        for field in self.fields() {
            let wire = WireType::of(*field);
            let bytes = &payload[offset..offset + wire.size()];
            let value = match wire {
                WireType::U32 => f64::from(u32::from_le_bytes(word(bytes))),
                WireType::F32 => f64::from(f32::from_le_bytes(word(bytes))),
                WireType::Flag => f64::from(u8::from(bytes[0] != 0)),
            };
            field.set(&mut packet, value);
            offset += wire.size();
        }

        Ok(packet)
    }

    /// Decode a complete frame, checking its trailer first.
    pub fn parse_frame(&self, frame: &[u8]) -> Result<Packet, PacketError> {
        if frame.len() != self.frame_size() {
            return Err(PacketError::LengthMismatch {
                expected: self.frame_size(),
                actual: frame.len(),
            });
        }
        let payload = checksum::verify(frame)?;
        self.parse(payload)
    }

    /// Encode the fields this version defines. Other fields are ignored.
    pub fn serialize(&self, packet: &Packet) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.frame_size());
        for field in self.fields() {
            let value = field.get(packet);
            match WireType::of(*field) {
                WireType::U32 => payload.extend_from_slice(&(value as u32).to_le_bytes()),
                WireType::F32 => payload.extend_from_slice(&(value as f32).to_le_bytes()),
                WireType::Flag => payload.push(u8::from(value != 0.0)),
            }
        }
        payload
    }

    /// Encode a packet and append the checksum trailer.
    pub fn encode_frame(&self, packet: &Packet) -> Vec<u8> {
        checksum::seal(self.serialize(packet))
    }
}
