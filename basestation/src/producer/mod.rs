//! Packet producers: where the consumer gets its packets from.
//!
//! - [`LiveProducer`] - Packets decoded from a live byte stream
//! - [`ReplayProducer`] - A recorded flight played back with its original timing
//!
//! Both implement [`Producer`], the pull interface used by
//! [`Consumer`](crate::processing::Consumer). Each call hands over the packets
//! that appeared since the previous call.

pub mod live;
pub mod replay;

pub use live::{LiveConfig, LiveError, LiveProducer};
pub use replay::{PlaybackMode, PlaybackState, ReplayConfig, ReplayError, ReplayProducer};

use std::sync::Arc;

use crate::packet::Packet;

/// Packets handed from a producer to the consumer in one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketBatch {
    pub packets: Vec<Packet>,
    /// The producer went backwards: the batch holds its whole visible
    /// history and everything derived from earlier batches is stale.
    pub restart: bool,
}

impl PacketBatch {
    pub fn append(packets: Vec<Packet>) -> Self {
        Self {
            packets,
            restart: false,
        }
    }

    pub fn restart(packets: Vec<Packet>) -> Self {
        Self {
            packets,
            restart: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }
}

/// Source of packets for the consumer.
pub trait Producer: Send + Sync {
    /// Take every packet published since the previous call.
    fn take_batch(&self) -> PacketBatch;
}

impl<P: Producer + ?Sized> Producer for Arc<P> {
    fn take_batch(&self) -> PacketBatch {
        (**self).take_batch()
    }
}
