//! Network delay indicator.

use std::time::Duration;

/// Tracks whether the client is visibly short of data.
///
/// Raised when the playout buffer runs dry, cleared once a full lifetime
/// passes without another starvation. Both methods report only transitions,
/// so a listener is told at most once per change.
#[derive(Debug, Clone)]
pub struct DelayTracker {
    lifetime: Duration,
    has_network_delay: bool,
    last_starvation: Duration,
}

impl DelayTracker {
    #[must_use]
    pub const fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            has_network_delay: false,
            last_starvation: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn has_network_delay(&self) -> bool {
        self.has_network_delay
    }

    /// Records a starvation at `now`. Returns `true` if the indicator was raised.
    pub fn starved(&mut self, now: Duration) -> bool {
        self.last_starvation = now;
        let raised = !self.has_network_delay;
        self.has_network_delay = true;
        raised
    }

    /// Clears the indicator if it has outlived its lifetime. Returns `true` if
    /// it was cleared.
    pub fn expire(&mut self, now: Duration) -> bool {
        if self.has_network_delay && now.saturating_sub(self.last_starvation) > self.lifetime {
            self.has_network_delay = false;
            return true;
        }
        false
    }
}
