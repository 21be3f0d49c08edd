//! Request validation.

use rms_core::enums::Affinity;
use rms_core::model::{ObjectDetail, RequestInputParam};

use crate::error::ApplyError;

/// Reject requests that cannot be served whatever the pool holds.
///
/// Groups asking for a single host skip the affinity checks.
///
/// # Errors
///
/// Returns [`ApplyError::Validation`] describing the first offending group.
pub fn param_check(param: &RequestInputParam) -> Result<(), ApplyError> {
    if param.details.is_empty() {
        return Err(ApplyError::Validation("details must not be empty".into()));
    }
    for detail in &param.details {
        check_detail(detail)?;
    }
    Ok(())
}

/// [`param_check`] plus an upper bound on the number of groups.
///
/// # Errors
///
/// Returns [`ApplyError::TooManyDetails`] or any [`param_check`] error.
pub fn param_check_with_limit(param: &RequestInputParam, max_details: usize) -> Result<(), ApplyError> {
    if param.details.len() > max_details {
        return Err(ApplyError::TooManyDetails {
            count: param.details.len(),
            max: max_details,
        });
    }
    param_check(param)
}

fn check_detail(detail: &ObjectDetail) -> Result<(), ApplyError> {
    let group = &detail.group_mark;
    if group.trim().is_empty() {
        return Err(ApplyError::Validation("group_mark is required".into()));
    }
    if detail.count == 0 {
        return Err(ApplyError::Validation(format!(
            "group {group}: count must be at least 1"
        )));
    }
    for disk in &detail.storage_specs {
        if !disk.is_legal() {
            return Err(ApplyError::Validation(format!(
                "group {group}: disk min {} greater than max {}",
                disk.min_size, disk.max_size
            )));
        }
    }
    let cpu = detail.spec.cpu;
    if !cpu.is_legal() {
        return Err(ApplyError::Validation(format!(
            "group {group}: illegal cpu range: min:{},max:{}",
            cpu.min, cpu.max
        )));
    }
    let mem = detail.spec.mem;
    if !mem.is_legal() {
        return Err(ApplyError::Validation(format!(
            "group {group}: illegal mem range: min:{},max:{}",
            mem.min, mem.max
        )));
    }

    if detail.count <= 1 {
        return Ok(());
    }
    let location = &detail.location_spec;
    if detail.affinity.requires_location() && location.is_empty() {
        return Err(ApplyError::Validation(format!(
            "group {group}: affinity {} needs a city in location_spec",
            detail.affinity
        )));
    }
    if detail.affinity == Affinity::CrossSubzone
        && location.include_or_exclude
        && location.sub_zone_ids.len() < 2
    {
        return Err(ApplyError::Validation(format!(
            "group {group}: cross sub-zone placement needs at least 2 included sub-zones"
        )));
    }
    Ok(())
}
