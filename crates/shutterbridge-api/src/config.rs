use std::num::NonZeroU32;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct BridgeConfig {
    pub name: String,
}

/// Connection settings for a single shutter device.
///
/// The device speaks plain http on its local address, so `host` is an
/// authority (`hostname` or `hostname:port`), not a full URL.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ShutterConfig {
    pub host: String,
    pub name: Option<String>,
    pub timeout_secs: Option<NonZeroU32>,
    pub poll_interval_secs: Option<NonZeroU32>,
}

impl ShutterConfig {
    pub const DEFAULT_TIMEOUT_SECS: u32 = 10;
    pub const DEFAULT_POLL_INTERVAL_SECS: u32 = 15;

    #[must_use]
    pub fn timeout(&self) -> Duration {
        let secs = self
            .timeout_secs
            .map_or(Self::DEFAULT_TIMEOUT_SECS, NonZeroU32::get);
        Duration::from_secs(u64::from(secs))
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        let secs = self
            .poll_interval_secs
            .map_or(Self::DEFAULT_POLL_INTERVAL_SECS, NonZeroU32::get);
        Duration::from_secs(u64::from(secs))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub bridge: BridgeConfig,
    pub shutter: ShutterConfig,
}
