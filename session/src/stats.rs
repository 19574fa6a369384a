//! Session counters.

use serde::Serialize;

/// Running totals for one session. Never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub packets_sent: u64,
    pub bytes_sent: u64,
    pub packets_received: u64,
    pub packets_malformed: u64,
    /// Stale or duplicate packets dropped by the ordering check.
    pub packets_discarded: u64,
    /// Packets dropped to respect the high watermark.
    pub packets_trimmed: u64,
    pub packets_applied: u64,
    pub half_weight_ticks: u64,
    pub starvations: u64,
    pub delay_transitions: u64,
}
