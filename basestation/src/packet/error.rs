//! Error types for packet decoding.

use thiserror::Error;

/// Errors raised while framing or decoding telemetry packets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    /// The payload does not have the version's fixed size.
    #[error("Payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The trailing checksum byte does not match the payload.
    #[error("Checksum mismatch: frame carries {actual:#04x}, payload sums to {expected:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// The configured protocol version has no codec.
    #[error("Unsupported packet version {0} (supported: 2017, 2018, 2019)")]
    UnsupportedVersion(u16),
}
