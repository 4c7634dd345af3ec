//! Frame checksum.
//!
//! A frame is the payload followed by one checksum octet: the sum of all
//! payload bytes modulo 256.

use super::PacketError;

/// Sum of the payload bytes, modulo 256.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

/// Append the checksum trailer to a payload.
pub fn seal(mut payload: Vec<u8>) -> Vec<u8> {
    let trailer = checksum(&payload);
    payload.push(trailer);
    payload
}

/// Split a frame into its payload after checking the trailer.
pub fn verify(frame: &[u8]) -> Result<&[u8], PacketError> {
    let Some((&actual, payload)) = frame.split_last() else {
        return Err(PacketError::LengthMismatch {
            expected: 1,
            actual: 0,
        });
    };

    let expected = checksum(payload);
    if expected == actual {
        Ok(payload)
    } else {
        Err(PacketError::ChecksumMismatch { expected, actual })
    }
}

/// Returns true if the frame's trailer matches its payload.
pub fn validate(frame: &[u8]) -> bool {
    verify(frame).is_ok()
}
