use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::hardware::DEFAULT_STROBE_PERIOD;

/// Bridge settings supplied by the host, usually as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Maximum log level, `Warn` when unset.
    pub log_level: Option<log::Level>,
    pub strobe_period_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig { log_level: None, strobe_period_ms: DEFAULT_STROBE_PERIOD.as_millis() as u64 }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn strobe_period(&self) -> Duration {
        Duration::from_millis(self.strobe_period_ms.max(1))
    }
}
