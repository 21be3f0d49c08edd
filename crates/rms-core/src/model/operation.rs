use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::OperationType;
use crate::model::host::HostRecord;

/// Hosts handed out for one apply group, identified by its group mark.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GroupAllocation {
    pub item: String,
    pub data: Vec<HostRecord>,
}

impl GroupAllocation {
    #[must_use]
    pub fn bk_host_ids(&self) -> Vec<i64> {
        self.data.iter().map(|h| h.bk_host_id).collect()
    }

    #[must_use]
    pub fn ips(&self) -> Vec<String> {
        self.data.iter().map(|h| h.ip.clone()).collect()
    }
}

/// One line of the operation log.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OperationRecord {
    pub request_id: String,
    pub total_count: u32,
    pub operation_type: OperationType,
    pub bk_host_ids: Vec<i64>,
    pub ip_list: Vec<String>,
    pub bill_id: String,
    pub bill_type: String,
    pub task_id: String,
    pub operator: String,
    /// Apply mode, e.g. `prepared` for a dry run or `consumed`.
    pub status: String,
    pub description: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}
