//! Live acquisition from the radio link.
//!
//! The receiver's byte stream is read in chunks and framed by a
//! [`FrameScanner`]. Decoded packets go to two places: the pending list the
//! consumer drains, and the flight history that gets saved at the end.
//!
//! # Example
//!
//! ```ignore
//! let producer = Arc::new(LiveProducer::new(codec, LiveConfig::default(), Arc::new(CsvPersister)));
//! let serial = tokio::fs::File::open("/dev/ttyUSB0").await?;
//! let handle = producer.start(serial, cancellation.clone());
//!
//! let batch = producer.take_batch();
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::packet::{FrameScanner, Packet, PacketCodec, ScanStats};
use crate::persistence::{DataPersister, PersistenceError};

use super::{PacketBatch, Producer};

/// Live acquisition configuration.
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// Timeout for a single read from the source.
    pub recv_timeout: Duration,

    /// Size of the read buffer.
    pub read_chunk_size: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            recv_timeout: Duration::from_millis(500),
            read_chunk_size: 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    #[error("Failed to read from the live source: {0}")]
    Read(#[source] std::io::Error),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Default)]
struct LiveBuffer {
    pending: Vec<Packet>,
    history: Vec<Packet>,
    unsaved: bool,
    stats: ScanStats,
}

/// Producer fed by a byte stream.
pub struct LiveProducer {
    codec: PacketCodec,
    config: LiveConfig,
    persister: Arc<dyn DataPersister>,
    buffer: Mutex<LiveBuffer>,
}

impl LiveProducer {
    pub fn new(codec: PacketCodec, config: LiveConfig, persister: Arc<dyn DataPersister>) -> Self {
        Self {
            codec,
            config,
            persister,
            buffer: Mutex::new(LiveBuffer::default()),
        }
    }

    pub fn codec(&self) -> &PacketCodec {
        &self.codec
    }

    /// Spawn the acquisition task.
    ///
    /// The task stops at the end of the stream, when `cancellation` is
    /// triggered, or with an error when a read fails.
    pub fn start<R>(
        self: &Arc<Self>,
        source: R,
        cancellation: CancellationToken,
    ) -> JoinHandle<Result<(), LiveError>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(Arc::clone(self).run(source, cancellation))
    }

    async fn run<R>(
        self: Arc<Self>,
        mut source: R,
        cancellation: CancellationToken,
    ) -> Result<(), LiveError>
    where
        R: AsyncRead + Unpin,
    {
        info!(
            version = %self.codec.version(),
            frame_size = self.codec.frame_size(),
            "Live acquisition started"
        );

        let mut scanner = FrameScanner::new(self.codec);
        let mut chunk = vec![0u8; self.config.read_chunk_size.max(1)];
        let mut bytes_received: u64 = 0;

        loop {
            if cancellation.is_cancelled() {
                debug!("Live acquisition cancelled");
                break;
            }

            match tokio::time::timeout(self.config.recv_timeout, source.read(&mut chunk)).await {
                Ok(Ok(0)) => {
                    info!("Live source reached end of stream");
                    break;
                }
                Ok(Ok(len)) => {
                    if bytes_received == 0 {
                        info!(len, "Received first bytes from live source");
                    }
                    bytes_received += len as u64;

                    let packets = scanner.push(&chunk[..len]);
                    self.publish(packets, scanner.stats());
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Live source read failed");
                    return Err(LiveError::Read(e));
                }
                Err(_) => {
                    trace!("No live data received (timeout)");
                }
            }
        }

        let stats = scanner.stats();
        info!(
            bytes_received,
            frames_accepted = stats.frames_accepted,
            frames_rejected = stats.frames_rejected,
            bytes_skipped = stats.bytes_skipped,
            "Live acquisition stopped"
        );
        Ok(())
    }

    fn publish(&self, packets: Vec<Packet>, stats: ScanStats) {
        let mut buffer = self.lock_buffer();
        buffer.stats = stats;
        if packets.is_empty() {
            return;
        }
        buffer.history.extend_from_slice(&packets);
        buffer.pending.extend(packets);
        buffer.unsaved = true;
    }

    /// Inject a packet as if it had been received.
    pub fn add_packet(&self, packet: Packet) {
        let mut buffer = self.lock_buffer();
        buffer.pending.push(packet);
        buffer.history.push(packet);
        buffer.unsaved = true;
    }

    /// Forget everything received so far.
    pub fn clear_packets(&self) {
        let mut buffer = self.lock_buffer();
        buffer.pending.clear();
        buffer.history.clear();
        buffer.unsaved = false;
    }

    /// Persist the flight history.
    pub fn save(&self, path: &Path) -> Result<(), LiveError> {
        let history = self.lock_buffer().history.clone();
        self.persister.save(path, &history, &self.codec)?;
        self.lock_buffer().unsaved = false;
        info!(path = %path.display(), packets = history.len(), "Flight saved");
        Ok(())
    }

    pub fn has_unsaved_data(&self) -> bool {
        self.lock_buffer().unsaved
    }

    /// Packets received since the start or the last clear.
    pub fn packet_count(&self) -> usize {
        self.lock_buffer().history.len()
    }

    pub fn scan_stats(&self) -> ScanStats {
        self.lock_buffer().stats
    }

    fn lock_buffer(&self) -> MutexGuard<'_, LiveBuffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Producer for LiveProducer {
    fn take_batch(&self) -> PacketBatch {
        PacketBatch::append(std::mem::take(&mut self.lock_buffer().pending))
    }
}
