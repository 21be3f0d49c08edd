use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Affinity;
use crate::model::spec::{DiskSpec, LocationSpec, Spec};

/// A host explicitly named by an apply group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Host {
    pub bk_host_id: i64,
    #[serde(default)]
    pub ip: String,
}

/// Hosts explicitly named by an apply group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct Hosts(pub Vec<Host>);

impl Hosts {
    #[must_use]
    pub fn bk_host_ids(&self) -> Vec<i64> {
        self.0.iter().map(|h| h.bk_host_id).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One apply group: `count` hosts sharing a spec and an affinity rule.
///
/// Hosts are matched either by device class or by the cpu/mem spec; the two
/// are alternatives, not a conjunction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ObjectDetail {
    #[serde(default)]
    pub bk_cloud_id: i64,
    #[serde(default)]
    pub hosts: Hosts,
    pub group_mark: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Machine types, e.g. `"IT5.8XLARGE128"`.
    #[serde(default)]
    pub device_class: Vec<String>,
    #[serde(default)]
    pub spec: Spec,
    #[serde(default, rename = "storage_spec")]
    pub storage_specs: Vec<DiskSpec>,
    #[serde(default)]
    pub location_spec: LocationSpec,
    #[serde(default)]
    pub affinity: Affinity,
    /// `Linux` or `Windows`; empty matches both.
    #[serde(default)]
    pub os_type: String,
    #[serde(default)]
    pub os_names: Vec<String>,
    #[serde(default)]
    pub exclude_os_name: bool,
    pub count: u32,
}

/// Ticket context recorded with every consumption.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ActionInfo {
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub bill_id: String,
    #[serde(default)]
    pub bill_type: String,
    #[serde(default)]
    pub operator: String,
}

/// Body of an apply request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RequestInputParam {
    /// What the hosts are for, e.g. `MySQL`, `Redis`, `Proxy`.
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, rename = "for_biz_id")]
    pub for_biz_id: i64,
    pub details: Vec<ObjectDetail>,
    #[serde(default)]
    pub groups_in_same_location: bool,
    #[serde(flatten)]
    pub action: ActionInfo,
}

impl RequestInputParam {
    /// Total number of hosts asked for across all groups.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.details.iter().map(|d| d.count).sum()
    }
}
