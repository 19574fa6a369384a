//! Receive side of a client session, shareable with a network thread.

use std::sync::Arc;

use codec::{CodecResult, Limits, PacketNumber, PhysicsSyncData};
use parking_lot::{Mutex, MutexGuard};

use crate::PlayoutBuffer;

#[derive(Debug)]
pub(crate) struct InboxState {
    pub(crate) buffer: PlayoutBuffer,
    pub(crate) received: u64,
    pub(crate) malformed: u64,
}

/// Cloneable handle that appends received packets to a session's queue.
///
/// Appending only takes the lock for a push; decoding happens before the
/// lock is taken. Safe to move to the thread that owns the socket.
#[derive(Debug, Clone)]
pub struct Inbox {
    state: Arc<Mutex<InboxState>>,
    limits: Limits,
}

impl Inbox {
    pub(crate) fn new(buffer: PlayoutBuffer, limits: Limits) -> Self {
        Self {
            state: Arc::new(Mutex::new(InboxState {
                buffer,
                received: 0,
                malformed: 0,
            })),
            limits,
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, InboxState> {
        self.state.lock()
    }

    /// Queues an already decoded packet.
    pub fn receive(&self, packet: PhysicsSyncData) {
        let mut state = self.state.lock();
        state.buffer.push(packet);
        state.received += 1;
    }

    /// Decodes and queues a packet.
    ///
    /// A malformed packet is dropped, logged and counted; the error is
    /// returned for callers that want it, but never needs handling.
    pub fn receive_bytes(&self, bytes: &[u8]) -> CodecResult<PacketNumber> {
        match PhysicsSyncData::decode_with_limits(bytes, &self.limits) {
            Ok(packet) => {
                let number = packet.packet_number;
                self.receive(packet);
                Ok(number)
            }
            Err(err) => {
                tracing::warn!(
                    len = bytes.len(),
                    error = %err,
                    "dropping malformed physics packet"
                );
                self.state.lock().malformed += 1;
                Err(err)
            }
        }
    }

    /// Packets waiting to be consumed.
    pub fn queued(&self) -> usize {
        self.state.lock().buffer.len()
    }
}
