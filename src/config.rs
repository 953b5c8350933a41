use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_MC_RETRIES: u32 = 3;
const DEFAULT_MC_RETRY_INTERVAL_MS: u64 = 1000;

/// Retry tunables for a removal call.
///
/// `mc_retries = 0` performs exactly one classification pass;
/// `mc_retry_interval_ms = 0` retries back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoverConfig {
    pub mc_retries: u32,
    pub mc_retry_interval_ms: u64,
}

impl Default for RemoverConfig {
    fn default() -> Self {
        RemoverConfig {
            mc_retries: DEFAULT_MC_RETRIES,
            mc_retry_interval_ms: DEFAULT_MC_RETRY_INTERVAL_MS,
        }
    }
}

impl RemoverConfig {
    pub fn new(mc_retries: u32, retry_interval: Duration) -> Self {
        RemoverConfig {
            mc_retries,
            mc_retry_interval_ms: retry_interval.as_millis() as u64,
        }
    }

    pub fn from_env() -> Self {
        RemoverConfig {
            mc_retries: env::var("NODEWIPE_MC_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MC_RETRIES),
            mc_retry_interval_ms: env::var("NODEWIPE_MC_RETRY_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MC_RETRY_INTERVAL_MS),
        }
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.mc_retry_interval_ms)
    }
}
