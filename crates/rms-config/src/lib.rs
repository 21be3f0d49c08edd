//! # rms-config
//!
//! Layered configuration loading for dbrms using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DBRMS_*` prefix, `__` as separator)
//! 2. Project-level `.dbrms/config.toml`
//! 3. User-level `~/.config/dbrms/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `DBRMS_LOCK__WAIT_TIMEOUT_SECS` -> `lock.wait_timeout_secs`,
//! `DBRMS_POOL__PATH` -> `pool.path`, etc.
//!
//! ```no_run
//! use rms_config::RmsConfig;
//!
//! let config = RmsConfig::load_with_dotenv().expect("config");
//! println!("pool file: {}", config.pool.path.display());
//! ```

mod apply;
mod error;
mod lock;
mod pool;

pub use apply::ApplyConfig;
pub use error::ConfigError;
pub use lock::LockConfig;
pub use pool::PoolConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RmsConfig {
    #[serde(default)]
    pub apply: ApplyConfig,
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub pool: PoolConfig,
}

impl RmsConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the current directory, then [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".dbrms/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DBRMS_").split("__"))
    }

    /// Reject values that would make the apply loop misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.apply.max_details == 0 {
            return Err(ConfigError::InvalidValue {
                field: "apply.max_details".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.lock.retry_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lock.retry_delay_ms".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dbrms").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RmsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lock.wait_timeout_secs, 300);
        assert_eq!(config.pool.path, PathBuf::from(".dbrms/pool.json"));
    }

    #[test]
    fn zero_retry_delay_is_rejected() {
        let mut config = RmsConfig::default();
        config.lock.retry_delay_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lock.retry_delay_ms"));
    }
}
