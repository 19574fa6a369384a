//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wire::Limits;

use crate::error::{SyncError, SyncResult};

/// Deepest playout queue a config may ask for, one full packet list.
pub const MAX_PACKET_COUNT: usize = wire::MAX_COUNT;

/// Tuning for the client playout buffer and delay indicator.
///
/// The watermark defaults are tuned constants, not derived ones; adjust them
/// for the network at hand. Every field has a default, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// High watermark: queue depth a refill waits for, and the hard cap on depth.
    pub max_packet_count: usize,

    /// Low watermark: at or below this depth each packet is stretched over two ticks.
    pub packet_count_to_slow_data_usage: usize,

    /// How long the delay indicator stays up after the last starvation.
    pub network_delay_status_lifetime_ms: u64,

    /// Limits applied to packets arriving as bytes.
    pub limits: Limits,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_packet_count: 8,
            packet_count_to_slow_data_usage: 4,
            network_delay_status_lifetime_ms: 3000,
            limits: Limits::default(),
        }
    }
}

impl SyncConfig {
    /// Parses a JSON config and validates it.
    pub fn from_json_str(json: &str) -> SyncResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| SyncError::InvalidConfig {
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks `1 <= packet_count_to_slow_data_usage < max_packet_count <= 511`.
    pub fn validate(&self) -> SyncResult<()> {
        if self.max_packet_count > MAX_PACKET_COUNT {
            return Err(SyncError::InvalidConfig {
                reason: format!(
                    "max_packet_count ({}) must be at most {MAX_PACKET_COUNT}",
                    self.max_packet_count
                ),
            });
        }
        if self.packet_count_to_slow_data_usage == 0 {
            return Err(SyncError::InvalidConfig {
                reason: "packet_count_to_slow_data_usage must be at least 1".to_owned(),
            });
        }
        if self.packet_count_to_slow_data_usage >= self.max_packet_count {
            return Err(SyncError::InvalidConfig {
                reason: format!(
                    "packet_count_to_slow_data_usage ({}) must be below max_packet_count ({})",
                    self.packet_count_to_slow_data_usage, self.max_packet_count
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn network_delay_status_lifetime(&self) -> Duration {
        Duration::from_millis(self.network_delay_status_lifetime_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.max_packet_count, 8);
        assert_eq!(config.packet_count_to_slow_data_usage, 4);
        assert_eq!(
            config.network_delay_status_lifetime(),
            Duration::from_secs(3)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SyncConfig::from_json_str(r#"{ "max_packet_count": 12 }"#).unwrap();
        assert_eq!(config.max_packet_count, 12);
        assert_eq!(config.packet_count_to_slow_data_usage, 4);
        assert_eq!(config.limits, Limits::default());
    }

    #[test]
    fn nested_limits() {
        let config =
            SyncConfig::from_json_str(r#"{ "limits": { "max_sounds": 10 } }"#).unwrap();
        assert_eq!(config.limits.max_sounds, 10);
        assert_eq!(config.limits.max_nodes, Limits::default().max_nodes);
    }

    #[test]
    fn unknown_field_rejected() {
        let err = SyncConfig::from_json_str(r#"{ "max_packets": 12 }"#).unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig { .. }));
    }

    #[test]
    fn watermarks_must_be_ordered() {
        let config = SyncConfig {
            max_packet_count: 4,
            packet_count_to_slow_data_usage: 4,
            ..SyncConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SyncConfig {
            packet_count_to_slow_data_usage: 0,
            ..SyncConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_packet_count_is_bounded() {
        let config = SyncConfig {
            max_packet_count: MAX_PACKET_COUNT,
            ..SyncConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = SyncConfig {
            max_packet_count: MAX_PACKET_COUNT + 1,
            ..SyncConfig::default()
        };
        assert!(config.validate().is_err());

        let json = r#"{ "max_packet_count": 18446744073709551615 }"#;
        let err = SyncConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("must be at most 511"));
    }

    #[test]
    fn from_json_validates() {
        let json = r#"{ "max_packet_count": 2, "packet_count_to_slow_data_usage": 3 }"#;
        let err = SyncConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("must be below"));
    }
}
