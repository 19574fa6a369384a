//! Client playout (jitter) buffer.
//!
//! [`PlayoutBuffer`] decides, once per tick, what the client should do with
//! the packets it has received. It never touches game objects; the session
//! acts on the returned [`PlayoutStep`] after releasing the inbox lock.
//!
//! Per tick:
//! 1. Drop every queued packet that is not newer than the last one consumed.
//! 2. While refilling, wait for the queue to reach the high watermark.
//! 3. Otherwise consume from the front: finish a half-applied packet, stretch
//!    one over two ticks when at or below the low watermark, or take one at
//!    full weight.
//! 4. An empty queue starts a refill.
//! 5. Trim the oldest packets beyond the high watermark.

use std::collections::VecDeque;

use codec::{PacketNumber, PhysicsSyncData};

/// What the client should do this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayoutStep {
    /// Waiting for the queue to refill; nothing to apply.
    Refilling,
    /// Apply this packet at full weight.
    Full(PhysicsSyncData),
    /// Apply this packet halfway; the next consuming tick completes it.
    Half(PhysicsSyncData),
    /// Re-apply the last packet's snapshots at full weight.
    Complete,
    /// The queue ran dry and a refill has started.
    Starved,
}

impl PlayoutStep {
    #[must_use]
    pub const fn kind(&self) -> StepKind {
        match self {
            Self::Refilling => StepKind::Refilling,
            Self::Full(_) => StepKind::Full,
            Self::Half(_) => StepKind::Half,
            Self::Complete => StepKind::Complete,
            Self::Starved => StepKind::Starved,
        }
    }
}

/// [`PlayoutStep`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Refilling,
    Full,
    Half,
    Complete,
    Starved,
}

/// Result of one [`PlayoutBuffer::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayoutTick {
    pub step: PlayoutStep,
    /// Stale or duplicate packets dropped before consuming.
    pub discarded: usize,
    /// Packets dropped to respect the high watermark.
    pub trimmed: usize,
}

/// Bounded FIFO of received packets with refill and half-weight state.
#[derive(Debug, Clone)]
pub struct PlayoutBuffer {
    queue: VecDeque<PhysicsSyncData>,
    max_packet_count: usize,
    packet_count_to_slow_data_usage: usize,
    refilling: bool,
    half_applied: bool,
    last_packet_number_read: PacketNumber,
}

impl PlayoutBuffer {
    /// Creates an empty buffer that starts out refilling.
    #[must_use]
    pub fn new(max_packet_count: usize, packet_count_to_slow_data_usage: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max_packet_count,
            packet_count_to_slow_data_usage,
            refilling: true,
            half_applied: false,
            last_packet_number_read: PacketNumber::default(),
        }
    }

    /// Sets the packet number treated as already consumed.
    #[must_use]
    pub fn with_last_read(mut self, last: PacketNumber) -> Self {
        self.last_packet_number_read = last;
        self
    }

    /// Appends a received packet. Ordering is sorted out on the next tick.
    pub fn push(&mut self, packet: PhysicsSyncData) {
        self.queue.push_back(packet);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[must_use]
    pub const fn is_refilling(&self) -> bool {
        self.refilling
    }

    #[must_use]
    pub const fn is_half_applied(&self) -> bool {
        self.half_applied
    }

    #[must_use]
    pub const fn last_packet_number_read(&self) -> PacketNumber {
        self.last_packet_number_read
    }

    /// Packet numbers currently queued, oldest first.
    pub fn queued_numbers(&self) -> impl Iterator<Item = PacketNumber> + '_ {
        self.queue.iter().map(|packet| packet.packet_number)
    }

    /// Drops every queued packet that is not newer than the last one consumed.
    ///
    /// Filters the whole queue, not just the front: a stale packet stuck
    /// behind a newer one is removed too.
    pub fn discard_out_of_order(&mut self) -> usize {
        let last = self.last_packet_number_read;
        let before = self.queue.len();
        self.queue.retain(|packet| packet.packet_number.is_newer_than(last));
        before - self.queue.len()
    }

    /// Runs one tick of the playout algorithm.
    pub fn tick(&mut self) -> PlayoutTick {
        let discarded = self.discard_out_of_order();

        let step = if self.refilling {
            if self.queue.len() >= self.max_packet_count {
                self.refilling = false;
            }
            PlayoutStep::Refilling
        } else if self.queue.is_empty() {
            self.refilling = true;
            PlayoutStep::Starved
        } else if self.half_applied {
            self.half_applied = false;
            PlayoutStep::Complete
        } else if self.queue.len() <= self.packet_count_to_slow_data_usage {
            match self.pop() {
                Some(packet) => {
                    self.half_applied = true;
                    PlayoutStep::Half(packet)
                }
                None => PlayoutStep::Starved,
            }
        } else {
            self.pop().map_or(PlayoutStep::Starved, PlayoutStep::Full)
        };

        let trimmed = self.trim();
        PlayoutTick {
            step,
            discarded,
            trimmed,
        }
    }

    fn pop(&mut self) -> Option<PhysicsSyncData> {
        let packet = self.queue.pop_front()?;
        self.last_packet_number_read = packet.packet_number;
        Some(packet)
    }

    fn trim(&mut self) -> usize {
        let excess = self.queue.len().saturating_sub(self.max_packet_count);
        self.queue.drain(..excess);
        excess
    }
}
