//! Controller configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Controller timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Host silence after which the link is shown as disconnected (milliseconds)
    pub liveness_timeout_ms: u64,
    /// Delay between accepting a reboot request and the reboot (milliseconds)
    pub reboot_delay_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            liveness_timeout_ms: 10_000,
            reboot_delay_ms: 100,
        }
    }
}

impl ControllerConfig {
    /// Liveness window
    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_millis(self.liveness_timeout_ms)
    }

    pub(crate) fn liveness_timeout_us(&self) -> u64 {
        self.liveness_timeout_ms.saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.liveness_timeout(), Duration::from_secs(10));
        assert_eq!(config.liveness_timeout_us(), 10_000_000);
        assert_eq!(config.reboot_delay_ms, 100);
    }
}
