//! Apply lock settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from(".dbrms/locks")
}

const fn default_wait_timeout_secs() -> u64 {
    300
}

const fn default_retry_delay_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LockConfig {
    /// Directory holding one lock file per lock key.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl LockConfig {
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            wait_timeout_secs: default_wait_timeout_secs(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}
