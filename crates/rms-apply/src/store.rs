//! Pool file and operation log persistence.
//!
//! The pool is a JSON array of [`HostRecord`]s, rewritten atomically through a
//! sibling temp file. Operations are appended to a JSONL log.

use std::path::Path;

use chrono::Utc;
use rms_core::enums::OperationType;
use rms_core::model::{GroupAllocation, HostRecord, OperationRecord, RequestInputParam};

use crate::error::ApplyError;

/// Status recorded for dry runs.
pub const MODE_PREPARED: &str = "prepared";
/// Status recorded when hosts were handed out.
pub const MODE_CONSUMED: &str = "consumed";

/// Read the pool; a missing file is an empty pool.
///
/// # Errors
///
/// Returns [`ApplyError::Io`] or [`ApplyError::Json`] when the file exists but
/// cannot be read or parsed.
pub fn load_pool(path: &Path) -> Result<Vec<HostRecord>, ApplyError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Replace the pool file with `pool`.
///
/// # Errors
///
/// Returns [`ApplyError::Io`] or [`ApplyError::Json`] on write failure.
pub fn save_pool(path: &Path, pool: &[HostRecord]) -> Result<(), ApplyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_vec_pretty(pool)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Build the log line for a served request.
#[must_use]
pub fn operation_record(
    param: &RequestInputParam,
    request_id: &str,
    mode: &str,
    groups: &[GroupAllocation],
) -> OperationRecord {
    let now = Utc::now();
    OperationRecord {
        request_id: request_id.to_string(),
        total_count: param.total_count(),
        operation_type: OperationType::Consumed,
        bk_host_ids: groups.iter().flat_map(GroupAllocation::bk_host_ids).collect(),
        ip_list: groups.iter().flat_map(GroupAllocation::ips).collect(),
        bill_id: param.action.bill_id.clone(),
        bill_type: param.action.bill_type.clone(),
        task_id: param.action.task_id.clone(),
        operator: param.action.operator.clone(),
        status: mode.to_string(),
        description: String::new(),
        create_time: now,
        update_time: now,
    }
}

/// Append `record` to the JSONL operation log.
///
/// # Errors
///
/// Returns [`ApplyError::Io`] when the log cannot be written.
pub fn append_operation(path: &Path, record: &OperationRecord) -> Result<(), ApplyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    serde_jsonlines::append_json_lines(path, [record])?;
    Ok(())
}

/// Read every record of the operation log.
///
/// # Errors
///
/// Returns [`ApplyError::Io`] when the log cannot be read or a line is invalid.
pub fn read_operations(path: &Path) -> Result<Vec<OperationRecord>, ApplyError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let records = serde_jsonlines::json_lines(path)?
        .collect::<std::io::Result<Vec<OperationRecord>>>()?;
    Ok(records)
}
