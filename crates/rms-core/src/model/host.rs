use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::HostStatus;

/// One disk of a pooled machine, keyed by mount point in [`HostRecord::storage_device`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DiskInfo {
    /// Size in GB.
    pub size: u32,
    #[serde(default)]
    pub disk_type: String,
    #[serde(default)]
    pub disk_id: String,
}

/// A machine in the resource pool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HostRecord {
    pub bk_host_id: i64,
    pub ip: String,
    #[serde(default)]
    pub bk_cloud_id: i64,
    #[serde(default)]
    pub bk_biz_id: i64,
    #[serde(default)]
    pub device_class: String,
    #[serde(default)]
    pub cpu_num: u32,
    /// Memory in MB.
    #[serde(default)]
    pub dram_cap: u32,
    #[serde(default)]
    pub storage_device: BTreeMap<String, DiskInfo>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub sub_zone: String,
    #[serde(default)]
    pub sub_zone_id: String,
    #[serde(default)]
    pub rack_id: String,
    #[serde(default)]
    pub net_device_id: String,
    #[serde(default)]
    pub os_type: String,
    #[serde(default)]
    pub os_name: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub status: HostStatus,
}

impl HostRecord {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == HostStatus::Unused
    }
}
