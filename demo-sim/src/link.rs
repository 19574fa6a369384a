use crate::rng::Rng;

/// One-way link that drops packets and delays each survivor by a random
/// number of ticks, which reorders them.
pub struct LossyLink {
    rng: Rng,
    loss: f64,
    max_jitter: u32,
    in_flight: Vec<InFlight>,
    next_seq: u64,
    dropped: u64,
}

struct InFlight {
    deliver_at: u64,
    seq: u64,
    bytes: Vec<u8>,
}

impl LossyLink {
    pub const fn new(seed: u64, loss: f64, max_jitter: u32) -> Self {
        Self {
            rng: Rng::new(seed),
            loss,
            max_jitter,
            in_flight: Vec::new(),
            next_seq: 0,
            dropped: 0,
        }
    }

    pub fn send(&mut self, tick: u64, bytes: Vec<u8>) {
        if self.rng.chance(self.loss) {
            self.dropped += 1;
            return;
        }
        let delay = u64::from(self.rng.range_u32(1, self.max_jitter.max(1)));
        self.in_flight.push(InFlight {
            deliver_at: tick + delay,
            seq: self.next_seq,
            bytes,
        });
        self.next_seq += 1;
    }

    /// Packets due at `tick`, in arrival order.
    pub fn deliver(&mut self, tick: u64) -> Vec<Vec<u8>> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(|packet| packet.deliver_at <= tick);
        self.in_flight = pending;
        due.sort_by_key(|packet| (packet.deliver_at, packet.seq));
        due.into_iter().map(|packet| packet.bytes).collect()
    }

    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossless_link_delivers_everything() {
        let mut link = LossyLink::new(1, 0.0, 1);
        link.send(0, vec![1]);
        link.send(0, vec![2]);
        assert!(link.deliver(0).is_empty());
        assert_eq!(link.deliver(1), vec![vec![1], vec![2]]);
        assert_eq!(link.dropped(), 0);
    }

    #[test]
    fn full_loss_drops_everything() {
        let mut link = LossyLink::new(1, 1.0, 3);
        for tick in 0..10 {
            link.send(tick, vec![0]);
        }
        assert!(link.deliver(100).is_empty());
        assert_eq!(link.dropped(), 10);
    }

    #[test]
    fn jitter_stays_bounded() {
        let mut link = LossyLink::new(9, 0.0, 4);
        for tick in 0..50 {
            link.send(tick, vec![tick as u8]);
        }
        assert_eq!(link.deliver(53).len(), 50);
    }
}
