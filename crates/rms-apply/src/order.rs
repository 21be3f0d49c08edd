//! Allocation order of apply groups.
//!
//! Groups with explicit requirements are matched before generic ones, so a
//! generic group cannot take the only machines a specific group could use.

use rms_core::enums::Affinity;
use rms_core::model::{ObjectDetail, RequestInputParam};
use tracing::debug;

use crate::queue::PriorityQueue;

/// Specificity score of a group.
///
/// One point per storage spec, one for a city, one more for a sub-zone list,
/// one for a device-class list.
#[must_use]
pub fn priority(detail: &ObjectDetail) -> i64 {
    let mut score = i64::try_from(detail.storage_specs.len()).unwrap_or(i64::MAX);
    if !detail.location_spec.is_empty() {
        score += 1;
        if !detail.location_spec.sub_zone_is_empty() {
            score += 1;
        }
    }
    if !detail.device_class.is_empty() {
        score += 1;
    }
    score
}

/// Indices into `param.details` in allocation order, with their priority.
#[must_use]
pub fn sorted_indices(param: &RequestInputParam) -> Vec<(usize, i64)> {
    if param.details.len() == 1 {
        return vec![(0, priority(&param.details[0]))];
    }
    let mut pq = PriorityQueue::new();
    for (idx, detail) in param.details.iter().enumerate() {
        let score = priority(detail);
        debug!(group = %detail.group_mark, priority = score, "queued apply group");
        pq.push(idx, score);
    }
    pq.collect()
}

/// Groups in allocation order.
#[must_use]
pub fn sort_details(param: &RequestInputParam) -> Vec<ObjectDetail> {
    sorted_indices(param)
        .into_iter()
        .map(|(idx, _)| param.details[idx].clone())
        .collect()
}

/// Distinct affinities of the request, in first-seen order.
#[must_use]
pub fn all_affinities(param: &RequestInputParam) -> Vec<Affinity> {
    let mut affinities = Vec::new();
    for detail in &param.details {
        if !affinities.contains(&detail.affinity) {
            affinities.push(detail.affinity);
        }
    }
    affinities
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rms_core::model::{DiskSpec, LocationSpec};

    fn named(group: &str) -> ObjectDetail {
        ObjectDetail {
            group_mark: group.into(),
            count: 1,
            ..ObjectDetail::default()
        }
    }

    #[test]
    fn priority_counts_each_constraint() {
        let mut d = named("g");
        assert_eq!(priority(&d), 0);

        d.storage_specs = vec![DiskSpec::default(), DiskSpec::default()];
        assert_eq!(priority(&d), 2);

        d.location_spec = LocationSpec {
            city: "shanghai".into(),
            ..LocationSpec::default()
        };
        assert_eq!(priority(&d), 3);

        d.location_spec.sub_zone_ids = vec!["sh-1".into()];
        assert_eq!(priority(&d), 4);

        d.device_class = vec!["S5.LARGE8".into()];
        assert_eq!(priority(&d), 5);
    }

    #[test]
    fn sub_zones_without_city_score_nothing() {
        let mut d = named("g");
        d.location_spec.sub_zone_ids = vec!["sh-1".into()];
        assert_eq!(priority(&d), 0);
    }

    #[test]
    fn specific_groups_sort_first_and_ties_keep_request_order() {
        let generic_a = named("generic-a");
        let mut disk = named("disk");
        disk.storage_specs = vec![DiskSpec::default()];
        let generic_b = named("generic-b");
        let mut located = named("located");
        located.location_spec.city = "shenzhen".into();
        located.location_spec.sub_zone_ids = vec!["sz-1".into()];

        let param = RequestInputParam {
            details: vec![generic_a, disk, generic_b, located],
            ..RequestInputParam::default()
        };
        let order: Vec<String> = sort_details(&param)
            .into_iter()
            .map(|d| d.group_mark)
            .collect();
        assert_eq!(order, vec!["located", "disk", "generic-a", "generic-b"]);
        assert_eq!(
            sorted_indices(&param),
            vec![(3, 2), (1, 1), (0, 0), (2, 0)]
        );
    }

    #[test]
    fn single_group_is_returned_unchanged() {
        let param = RequestInputParam {
            details: vec![named("only")],
            ..RequestInputParam::default()
        };
        assert_eq!(sort_details(&param), param.details);
    }

    #[test]
    fn affinities_are_distinct_in_first_seen_order() {
        let mut a = named("a");
        a.affinity = Affinity::CrossRack;
        let b = named("b");
        let mut c = named("c");
        c.affinity = Affinity::CrossRack;
        let param = RequestInputParam {
            details: vec![a, b, c],
            ..RequestInputParam::default()
        };
        assert_eq!(
            all_affinities(&param),
            vec![Affinity::CrossRack, Affinity::None]
        );
    }
}
