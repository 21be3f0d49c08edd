//! Human readable apply summaries, failure messages, and lock keys.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rms_core::enums::Affinity;
use rms_core::model::{ObjectDetail, RequestInputParam};

/// One-paragraph summary of what a request asks for.
///
/// ```text
/// apply 3 groups, 5 machines in total
/// affinity CROSS_RACK: 1 groups, 2 machines
/// affinity NONE: 2 groups, 3 machines
/// ```
#[must_use]
pub fn build_message(param: &RequestInputParam) -> String {
    let mut groups: BTreeMap<Affinity, (usize, u32)> = BTreeMap::new();
    for detail in &param.details {
        let entry = groups.entry(detail.affinity).or_default();
        entry.0 += 1;
        entry.1 += detail.count;
    }
    let mut msg = format!(
        "apply {} groups, {} machines in total\n",
        param.details.len(),
        param.total_count()
    );
    let mut lines: Vec<(&'static str, usize, u32)> = groups
        .into_iter()
        .map(|(affinity, (n, count))| (affinity.as_str(), n, count))
        .collect();
    lines.sort_by(|a, b| a.0.cmp(b.0));
    for (affinity, n, count) in lines {
        let _ = writeln!(msg, "affinity {affinity}: {n} groups, {count} machines");
    }
    msg
}

/// Disk requirements of a group, one per line; empty when there are none.
#[must_use]
pub fn disk_match_info(detail: &ObjectDetail) -> String {
    let mut msg = String::new();
    for disk in &detail.storage_specs {
        let _ = writeln!(msg, "disk: {}", disk.describe());
    }
    msg
}

/// Everything a group asked for, shown when the pool cannot satisfy it.
#[must_use]
pub fn failure_message(detail: &ObjectDetail) -> String {
    let mut msg = format!("group: {}\n", detail.group_mark);
    if !detail.device_class.is_empty() {
        let _ = writeln!(msg, "device_class: {}", detail.device_class.join(","));
    }
    if detail.spec.not_empty() {
        let (cpu, mem) = (detail.spec.cpu, detail.spec.mem);
        if !cpu.is_empty() {
            let _ = writeln!(msg, "cpu: {} ~ {} cores", cpu.min, cpu.max);
        }
        if !mem.is_empty() {
            let _ = writeln!(msg, "mem: {} ~ {} MB", mem.min, mem.max);
        }
    }
    msg.push_str(&disk_match_info(detail));
    let location = &detail.location_spec;
    if !location.is_empty() {
        let _ = writeln!(msg, "city: {}", location.city);
        if !location.sub_zone_ids.is_empty() {
            let zones = location.sub_zone_ids.join(",");
            if location.include_or_exclude {
                let _ = writeln!(msg, "sub-zone must be one of [{zones}]");
            } else {
                let _ = writeln!(msg, "sub-zone must not be one of [{zones}]");
            }
        }
    }
    if !detail.os_names.is_empty() {
        let verb = if detail.exclude_os_name { "not " } else { "" };
        let _ = writeln!(msg, "os name {verb}in [{}]", detail.os_names.join(","));
    }
    let _ = writeln!(msg, "affinity: {}", detail.affinity.describe());
    let _ = writeln!(msg, "count: {}", detail.count);
    msg
}

/// Key serialising applies of one business (and resource type).
#[must_use]
pub fn lock_key(param: &RequestInputParam) -> String {
    if param.resource_type.trim().is_empty() {
        format!("dbrms:lock:bizid.{}", param.for_biz_id)
    } else {
        format!("dbrms:lock:{}:bizid.{}", param.resource_type, param.for_biz_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rms_core::model::{DiskSpec, LocationSpec, MeasureRange, Spec};

    fn detail(group: &str, affinity: Affinity, count: u32) -> ObjectDetail {
        ObjectDetail {
            group_mark: group.into(),
            affinity,
            count,
            ..ObjectDetail::default()
        }
    }

    #[test]
    fn summary_groups_by_affinity() {
        let param = RequestInputParam {
            details: vec![
                detail("a", Affinity::None, 1),
                detail("b", Affinity::CrossRack, 2),
                detail("c", Affinity::None, 2),
            ],
            ..RequestInputParam::default()
        };
        assert_eq!(
            build_message(&param),
            "apply 3 groups, 5 machines in total\n\
             affinity CROSS_RACK: 1 groups, 2 machines\n\
             affinity NONE: 2 groups, 3 machines\n"
        );
    }

    #[test]
    fn failure_message_lists_every_constraint() {
        let d = ObjectDetail {
            device_class: vec!["SA3.2XLARGE32".into()],
            spec: Spec {
                cpu: MeasureRange::new(8, 16),
                mem: MeasureRange::default(),
            },
            storage_specs: vec![DiskSpec {
                disk_type: "SSD".into(),
                min_size: 100,
                max_size: 0,
                mount_point: "/data".into(),
            }],
            location_spec: LocationSpec {
                city: "shenzhen".into(),
                sub_zone_ids: vec!["sz-1".into(), "sz-2".into()],
                include_or_exclude: true,
            },
            ..detail("backend", Affinity::CrossSubzone, 2)
        };
        assert_eq!(
            failure_message(&d),
            "group: backend\n\
             device_class: SA3.2XLARGE32\n\
             cpu: 8 ~ 16 cores\n\
             disk: mount point: /data disk type: SSD size >= 100 G\n\
             city: shenzhen\n\
             sub-zone must be one of [sz-1,sz-2]\n\
             affinity: same city, cross sub-zone\n\
             count: 2\n"
        );
    }

    #[test]
    fn disk_info_is_empty_without_disks() {
        assert_eq!(disk_match_info(&detail("a", Affinity::None, 1)), "");
    }

    #[test]
    fn lock_key_includes_resource_type_when_set() {
        let mut param = RequestInputParam {
            for_biz_id: 1001,
            ..RequestInputParam::default()
        };
        assert_eq!(lock_key(&param), "dbrms:lock:bizid.1001");
        param.resource_type = "Redis".into();
        assert_eq!(lock_key(&param), "dbrms:lock:Redis:bizid.1001");
    }
}
