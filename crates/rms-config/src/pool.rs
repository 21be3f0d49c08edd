//! Location of the host pool and the operation log.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_path() -> PathBuf {
    PathBuf::from(".dbrms/pool.json")
}

fn default_operation_log() -> PathBuf {
    PathBuf::from(".dbrms/operations.jsonl")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    /// JSON array of host records.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// JSONL file receiving one operation record per consumption.
    #[serde(default = "default_operation_log")]
    pub operation_log: PathBuf,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            operation_log: default_operation_log(),
        }
    }
}
