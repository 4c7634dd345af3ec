//! Byte-stream framing.
//!
//! The radio link delivers an unframed byte stream: there is no sync word,
//! only fixed-size frames ending in a checksum. The scanner slides a
//! frame-sized window over the buffered bytes. A window whose checksum
//! matches is decoded and consumed whole; a window that fails is advanced
//! by a single byte until the stream lines up with a frame boundary again.

use tracing::{debug, trace};

use super::checksum;
use super::{Packet, PacketCodec};

/// Counters describing the scanner's view of the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Frames that passed validation and decoded.
    pub frames_accepted: u64,
    /// Times the scanner lost frame alignment or dropped an undecodable frame.
    pub frames_rejected: u64,
    /// Bytes discarded while resynchronising.
    pub bytes_skipped: u64,
}

/// Incremental frame extractor for one protocol version.
#[derive(Debug)]
pub struct FrameScanner {
    codec: PacketCodec,
    buffer: Vec<u8>,
    in_sync: bool,
    stats: ScanStats,
}

impl FrameScanner {
    pub fn new(codec: PacketCodec) -> Self {
        Self {
            codec,
            buffer: Vec::with_capacity(codec.frame_size() * 4),
            in_sync: true,
            stats: ScanStats::default(),
        }
    }

    pub fn codec(&self) -> &PacketCodec {
        &self.codec
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Bytes held back waiting for the rest of a frame.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a chunk of raw bytes and return every packet completed by it.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Packet> {
        self.buffer.extend_from_slice(bytes);

        let frame_size = self.codec.frame_size();
        let mut packets = Vec::new();
        let mut start = 0;

        while self.buffer.len() - start >= frame_size {
            let window = &self.buffer[start..start + frame_size];

            match checksum::verify(window) {
                Ok(payload) => {
                    match self.codec.parse(payload) {
                        Ok(packet) => {
                            trace!(time_stamp = packet.time_stamp, "Frame decoded");
                            self.stats.frames_accepted += 1;
                            packets.push(packet);
                        }
                        Err(e) => {
                            self.stats.frames_rejected += 1;
                            debug!(error = %e, "Dropping undecodable frame");
                        }
                    }
                    self.in_sync = true;
                    start += frame_size;
                }
                Err(e) => {
                    if self.in_sync {
                        self.stats.frames_rejected += 1;
                        debug!(error = %e, offset = start, "Frame rejected, resynchronising");
                        self.in_sync = false;
                    }
                    self.stats.bytes_skipped += 1;
                    start += 1;
                }
            }
        }

        self.buffer.drain(..start);
        packets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::PacketVersion;

    fn codec() -> PacketCodec {
        PacketCodec::new(PacketVersion::V2017)
    }

    fn packet(i: u32) -> Packet {
        Packet {
            time_stamp: i,
            latitude: 3259.4,
            longitude: 10657.9,
            altitude: 1400.0 + i as f32 * 10.0,
            ..Default::default()
        }
    }

    fn stream(count: u32) -> Vec<u8> {
        (0..count).flat_map(|i| codec().encode_frame(&packet(i))).collect()
    }

    #[test]
    fn test_decodes_frames_split_across_chunks() {
        let mut scanner = FrameScanner::new(codec());
        let bytes = stream(3);

        let packets: Vec<Packet> = bytes
            .chunks(5)
            .flat_map(|chunk| scanner.push(chunk))
            .collect();

        assert_eq!(packets, vec![packet(0), packet(1), packet(2)]);
        assert_eq!(scanner.buffered(), 0);
        assert_eq!(scanner.stats().frames_accepted, 3);
        assert_eq!(scanner.stats().frames_rejected, 0);
    }

    #[test]
    fn test_partial_frame_is_held_back() {
        let mut scanner = FrameScanner::new(codec());
        let bytes = stream(1);

        assert!(scanner.push(&bytes[..10]).is_empty());
        assert_eq!(scanner.buffered(), 10);
        assert_eq!(scanner.push(&bytes[10..]), vec![packet(0)]);
    }

    #[test]
    fn test_corrupted_frame_is_dropped_and_scan_continues() {
        let mut scanner = FrameScanner::new(codec());
        let mut bytes = stream(3);
        bytes[6] ^= 0x01;

        let packets = scanner.push(&bytes);

        assert_eq!(packets, vec![packet(1), packet(2)]);
        assert_eq!(scanner.stats().frames_rejected, 1);
        assert_eq!(scanner.stats().bytes_skipped, 17);
    }

    #[test]
    fn test_resynchronises_after_junk_bytes() {
        let mut scanner = FrameScanner::new(codec());
        let mut bytes = vec![0xAA, 0x55, 0x13];
        bytes.extend(stream(2));

        let packets = scanner.push(&bytes);

        assert_eq!(packets, vec![packet(0), packet(1)]);
        assert_eq!(scanner.stats().bytes_skipped, 3);
        assert_eq!(scanner.stats().frames_rejected, 1);
    }
}
