//! Affinity-aware matching of apply groups against the host pool.
//!
//! Groups are served in [`sorted_indices`] order. Each group filters the pool
//! with [`matches`], then an affinity picker chooses `count` hosts among the
//! candidates. Hosts picked for one group are invisible to later groups. The
//! pool is only modified once every group has been served.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rms_core::enums::{Affinity, HostStatus};
use rms_core::model::{DiskInfo, DiskSpec, GroupAllocation, HostRecord, ObjectDetail, RequestInputParam};
use tracing::{debug, info};

use crate::error::ApplyError;
use crate::message::failure_message;
use crate::order::sorted_indices;
use crate::validate::param_check;

/// Whether `host` can serve `detail` for business `for_biz_id`.
///
/// Hosts of business `0` belong to the shared pool and serve everyone.
#[must_use]
pub fn matches(detail: &ObjectDetail, for_biz_id: i64, host: &HostRecord) -> bool {
    if !host.is_available() || host.bk_cloud_id != detail.bk_cloud_id {
        return false;
    }
    if host.bk_biz_id != 0 && host.bk_biz_id != for_biz_id {
        return false;
    }
    if !detail.hosts.is_empty() && !detail.hosts.0.iter().any(|h| h.bk_host_id == host.bk_host_id)
    {
        return false;
    }

    let wants_class = !detail.device_class.is_empty();
    let wants_spec = detail.spec.not_empty();
    if wants_class || wants_spec {
        let class_ok = wants_class && detail.device_class.contains(&host.device_class);
        let spec_ok = wants_spec
            && detail.spec.cpu.contains(host.cpu_num)
            && detail.spec.mem.contains(host.dram_cap);
        if !class_ok && !spec_ok {
            return false;
        }
    }

    let location = &detail.location_spec;
    if !location.is_empty() && (host.city != location.city || !location.admits(&host.sub_zone_id)) {
        return false;
    }

    if !detail
        .storage_specs
        .iter()
        .all(|disk| storage_satisfied(disk, host))
    {
        return false;
    }

    if !detail.labels.iter().all(|l| host.labels.contains(l)) {
        return false;
    }
    if !detail.os_type.is_empty() && !detail.os_type.eq_ignore_ascii_case(&host.os_type) {
        return false;
    }
    if !detail.os_names.is_empty() {
        let listed = detail.os_names.contains(&host.os_name);
        if listed == detail.exclude_os_name {
            return false;
        }
    }
    true
}

fn disk_satisfies(disk: &DiskSpec, info: &DiskInfo) -> bool {
    (disk.disk_type.is_empty() || disk.disk_type.eq_ignore_ascii_case(&info.disk_type))
        && disk.size_range().contains(info.size)
}

fn storage_satisfied(disk: &DiskSpec, host: &HostRecord) -> bool {
    if disk.mount_point.is_empty() {
        host.storage_device.values().any(|info| disk_satisfies(disk, info))
    } else {
        host.storage_device
            .get(&disk.mount_point)
            .is_some_and(|info| disk_satisfies(disk, info))
    }
}

/// Candidates grouped by sub-zone id, each list in pool order.
fn by_sub_zone(pool: &[HostRecord], candidates: &[usize]) -> BTreeMap<String, Vec<usize>> {
    let mut zones: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for &idx in candidates {
        zones
            .entry(pool[idx].sub_zone_id.clone())
            .or_default()
            .push(idx);
    }
    zones
}

/// Hosts on pairwise distinct racks, in candidate order. Hosts without a rack
/// id never conflict.
fn cross_rack_hosts(pool: &[HostRecord], candidates: &[usize], count: usize) -> Option<Vec<usize>> {
    let mut racks = HashSet::new();
    let mut picked = Vec::with_capacity(count);
    for &idx in candidates {
        if picked.len() == count {
            break;
        }
        let rack = pool[idx].rack_id.as_str();
        if rack.is_empty() || racks.insert(rack) {
            picked.push(idx);
        }
    }
    (picked.len() == count).then_some(picked)
}

/// Hosts on pairwise distinct racks and net devices.
///
/// Each host is an edge between its rack and its net device, so a valid set
/// is a matching of size `count`; augmenting paths find one whenever it
/// exists. Empty rack or device ids stand for a rack or device of their own.
fn cross_switch_hosts(pool: &[HostRecord], candidates: &[usize], count: usize) -> Option<Vec<usize>> {
    let mut rack_ids: HashMap<&str, usize> = HashMap::new();
    let mut device_ids: HashMap<&str, usize> = HashMap::new();
    // rack -> [(device, candidate position)]
    let mut racks: Vec<Vec<(usize, usize)>> = Vec::new();
    let mut devices = 0;

    for (pos, &idx) in candidates.iter().enumerate() {
        let host = &pool[idx];
        let rack = match host.rack_id.as_str() {
            "" => {
                racks.push(Vec::new());
                racks.len() - 1
            }
            id => *rack_ids.entry(id).or_insert_with(|| {
                racks.push(Vec::new());
                racks.len() - 1
            }),
        };
        let device = match host.net_device_id.as_str() {
            "" => {
                devices += 1;
                devices - 1
            }
            id => *device_ids.entry(id).or_insert_with(|| {
                devices += 1;
                devices - 1
            }),
        };
        racks[rack].push((device, pos));
    }

    let mut owner: Vec<Option<(usize, usize)>> = vec![None; devices];
    let mut matched = 0;
    for rack in 0..racks.len() {
        if matched == count {
            break;
        }
        let mut seen = vec![false; devices];
        if augment(rack, &racks, &mut owner, &mut seen) {
            matched += 1;
        }
    }
    if matched < count {
        return None;
    }

    let mut positions: Vec<usize> = owner.into_iter().flatten().map(|(_, pos)| pos).collect();
    positions.sort_unstable();
    Some(positions.into_iter().map(|pos| candidates[pos]).collect())
}

fn augment(
    rack: usize,
    racks: &[Vec<(usize, usize)>],
    owner: &mut [Option<(usize, usize)>],
    seen: &mut [bool],
) -> bool {
    for &(device, pos) in &racks[rack] {
        if seen[device] {
            continue;
        }
        seen[device] = true;
        let free = match owner[device] {
            None => true,
            Some((other, _)) => augment(other, racks, owner, seen),
        };
        if free {
            owner[device] = Some((rack, pos));
            return true;
        }
    }
    false
}

/// Take hosts from each zone in turn, largest zones first.
fn round_robin(zones: BTreeMap<String, Vec<usize>>, count: usize) -> Option<Vec<usize>> {
    let total: usize = zones.values().map(Vec::len).sum();
    if total < count {
        return None;
    }
    let mut lists: Vec<Vec<usize>> = zones.into_values().collect();
    lists.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut picked = Vec::with_capacity(count);
    let mut round = 0;
    while picked.len() < count {
        for list in &lists {
            if let Some(&idx) = list.get(round) {
                picked.push(idx);
                if picked.len() == count {
                    break;
                }
            }
        }
        round += 1;
    }
    Some(picked)
}

/// Choose `count` hosts among `candidates` under `affinity`.
#[must_use]
pub fn pick(
    affinity: Affinity,
    pool: &[HostRecord],
    candidates: &[usize],
    count: usize,
) -> Option<Vec<usize>> {
    if candidates.len() < count {
        return None;
    }
    if count <= 1 {
        return Some(candidates.iter().take(count).copied().collect());
    }
    match affinity {
        Affinity::None => Some(candidates[..count].to_vec()),
        Affinity::SameSubzone => by_sub_zone(pool, candidates)
            .into_values()
            .find(|hosts| hosts.len() >= count)
            .map(|hosts| hosts[..count].to_vec()),
        Affinity::SameSubzoneCrossSwitch => by_sub_zone(pool, candidates)
            .into_values()
            .find_map(|hosts| cross_switch_hosts(pool, &hosts, count)),
        Affinity::CrossRack => cross_rack_hosts(pool, candidates, count),
        Affinity::CrossSubzone => {
            let zones = by_sub_zone(pool, candidates);
            if zones.len() < 2 {
                return None;
            }
            round_robin(zones, count)
        }
        Affinity::MaxEachZoneEqual => round_robin(by_sub_zone(pool, candidates), count),
    }
}

/// Serve every group of `param` from `pool`.
///
/// Returns one [`GroupAllocation`] per group, in request order. Unless the
/// request is a dry run, the picked hosts are marked [`HostStatus::Used`].
///
/// # Errors
///
/// Returns the [`param_check`] error for invalid requests and
/// [`ApplyError::Insufficient`] for the first group the pool cannot serve;
/// the pool is left untouched in both cases.
pub fn allocate(
    param: &RequestInputParam,
    pool: &mut [HostRecord],
) -> Result<Vec<GroupAllocation>, ApplyError> {
    param_check(param)?;

    let mut taken: HashSet<usize> = HashSet::new();
    let mut pinned_zones: Option<BTreeSet<String>> = None;
    let mut picked_by_detail: Vec<Option<Vec<usize>>> = vec![None; param.details.len()];

    for (detail_idx, priority) in sorted_indices(param) {
        let detail = &param.details[detail_idx];
        let candidates: Vec<usize> = pool
            .iter()
            .enumerate()
            .filter(|(idx, host)| {
                !taken.contains(idx)
                    && matches(detail, param.for_biz_id, host)
                    && pinned_zones
                        .as_ref()
                        .is_none_or(|zones| zones.contains(&host.sub_zone_id))
            })
            .map(|(idx, _)| idx)
            .collect();
        debug!(
            group = %detail.group_mark,
            priority,
            candidates = candidates.len(),
            "matching apply group"
        );

        let count = detail.count as usize;
        let picked = pick(detail.affinity, pool, &candidates, count).ok_or_else(|| {
            ApplyError::Insufficient {
                group: detail.group_mark.clone(),
                message: failure_message(detail),
            }
        })?;

        if param.groups_in_same_location && pinned_zones.is_none() {
            pinned_zones = Some(picked.iter().map(|&i| pool[i].sub_zone_id.clone()).collect());
        }
        taken.extend(picked.iter().copied());
        info!(
            group = %detail.group_mark,
            affinity = %detail.affinity,
            hosts = picked.len(),
            "apply group served"
        );
        picked_by_detail[detail_idx] = Some(picked);
    }

    if !param.dry_run {
        let updates = taken
            .iter()
            .map(|&idx| Ok((idx, pool[idx].status.transition_to(HostStatus::Used)?)))
            .collect::<Result<Vec<_>, ApplyError>>()?;
        for (idx, status) in updates {
            pool[idx].status = status;
        }
    }

    Ok(param
        .details
        .iter()
        .zip(picked_by_detail)
        .map(|(detail, picked)| GroupAllocation {
            item: detail.group_mark.clone(),
            data: picked
                .unwrap_or_default()
                .into_iter()
                .map(|idx| pool[idx].clone())
                .collect(),
        })
        .collect())
}
