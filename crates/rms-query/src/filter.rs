//! WHERE clauses selecting pool candidates for one apply group.

use rms_core::enums::HostStatus;
use rms_core::model::{MeasureRange, ObjectDetail};

use crate::error::QueryError;
use crate::fragment::{SqlFragment, SqlValue, quote_ident};
use crate::json::{Dialect, JsonQuery};

/// Table holding pooled machines.
pub const DETAIL_TABLE: &str = "tb_rp_detail";

/// AND-combination of SQL predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<SqlFragment>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate; empty fragments are dropped.
    #[must_use]
    pub fn and(mut self, clause: SqlFragment) -> Self {
        if !clause.is_empty() {
            self.clauses.push(clause);
        }
        self
    }

    /// Add a rendered JSON predicate.
    ///
    /// # Errors
    ///
    /// Propagates [`QueryError`] from [`JsonQuery::build`].
    pub fn and_json(self, query: &JsonQuery) -> Result<Self, QueryError> {
        Ok(self.and(query.build(Dialect::Mysql)?))
    }

    #[must_use]
    pub fn eq(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.and(SqlFragment::new(
            format!("{} = ?", quote_ident(column)),
            vec![value.into()],
        ))
    }

    /// Case-insensitive equality on a text column.
    #[must_use]
    pub fn eq_ignore_case(self, column: &str, value: &str) -> Self {
        self.and(SqlFragment::new(
            format!("LOWER({}) = ?", quote_ident(column)),
            vec![value.to_lowercase().into()],
        ))
    }

    /// `column IN (...)`, or `NOT IN` when `negate` is set. No-op for an empty list.
    #[must_use]
    pub fn in_list<V: Into<SqlValue> + Clone>(self, column: &str, values: &[V], negate: bool) -> Self {
        if values.is_empty() {
            return self;
        }
        self.and(in_fragment(column, values, negate))
    }

    #[must_use]
    pub fn range(self, column: &str, range: MeasureRange) -> Self {
        match range_fragment(column, range) {
            Some(frag) => self.and(frag),
            None => self,
        }
    }

    /// Either group of predicates must hold.
    #[must_use]
    pub fn or(self, left: Self, right: Self) -> Self {
        match (left.is_empty(), right.is_empty()) {
            (true, _) | (_, true) => self,
            _ => {
                let l = left.build();
                let r = right.build();
                let mut args = l.args;
                args.extend(r.args);
                self.and(SqlFragment::new(format!("({}) OR ({})", l.sql, r.sql), args))
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Render as `(a) AND (b) ...`.
    #[must_use]
    pub fn build(&self) -> SqlFragment {
        let mut args = Vec::new();
        let mut parts = Vec::with_capacity(self.clauses.len());
        for clause in &self.clauses {
            parts.push(format!("({})", clause.sql.trim_end()));
            args.extend(clause.args.iter().cloned());
        }
        SqlFragment::new(parts.join(" AND "), args)
    }
}

fn in_fragment<V: Into<SqlValue> + Clone>(column: &str, values: &[V], negate: bool) -> SqlFragment {
    let placeholders = vec!["?"; values.len()].join(",");
    let op = if negate { "NOT IN" } else { "IN" };
    SqlFragment::new(
        format!("{} {op} ({placeholders})", quote_ident(column)),
        values.iter().cloned().map(Into::into).collect(),
    )
}

fn range_fragment(column: &str, range: MeasureRange) -> Option<SqlFragment> {
    let column = quote_ident(column);
    if range.max > 0 {
        Some(SqlFragment::new(
            format!("{column} BETWEEN ? AND ?"),
            vec![range.min.into(), range.max.into()],
        ))
    } else if range.min > 0 {
        Some(SqlFragment::new(
            format!("{column} >= ?"),
            vec![range.min.into()],
        ))
    } else {
        None
    }
}

/// Predicates a pooled machine must satisfy to serve `detail` for business
/// `for_biz_id`. Machines of business `0` are shared by every business.
///
/// # Errors
///
/// Propagates [`QueryError`] from the JSON predicates over `storage_device`
/// and `labels`.
pub fn candidate_filter(detail: &ObjectDetail, for_biz_id: i64) -> Result<Filter, QueryError> {
    let businesses: &[i64] = if for_biz_id == 0 { &[0] } else { &[0, for_biz_id] };
    let mut filter = Filter::new()
        .eq("bk_cloud_id", detail.bk_cloud_id)
        .in_list("bk_biz_id", businesses, false)
        .eq("status", HostStatus::Unused.as_str());

    if !detail.hosts.is_empty() {
        filter = filter.in_list("bk_host_id", &detail.hosts.bk_host_ids(), false);
    }

    let by_class = Filter::new().in_list("device_class", &detail.device_class, false);
    let by_spec = Filter::new()
        .range("cpu_num", detail.spec.cpu)
        .range("dram_cap", detail.spec.mem);
    filter = match (by_class.is_empty(), by_spec.is_empty()) {
        (false, false) => filter.or(by_class, by_spec),
        (false, true) => filter.and(by_class.build()),
        (true, false) => filter.and(by_spec.build()),
        (true, true) => filter,
    };

    let location = &detail.location_spec;
    if !location.is_empty() {
        filter = filter.eq("city", location.city.as_str()).in_list(
            "sub_zone_id",
            &location.sub_zone_ids,
            !location.include_or_exclude,
        );
    }

    for disk in &detail.storage_specs {
        if disk.mount_point.is_empty() {
            if !disk.disk_type.is_empty() {
                filter = filter.and_json(
                    &JsonQuery::new("storage_device").sub_val_contains(&disk.disk_type, "disk_type"),
                )?;
            }
            continue;
        }
        let size_path = [disk.mount_point.as_str(), "size"];
        let size = JsonQuery::new("storage_device");
        let size = match (disk.min_size, disk.max_size) {
            (min, max) if max > 0 => size.num_range(i64::from(min), i64::from(max), &size_path),
            (min, _) if min > 0 => size.gte(i64::from(min), &size_path),
            _ => size.has_key(&size_path),
        };
        filter = filter.and_json(&size)?;
        if !disk.disk_type.is_empty() {
            filter = filter.and_json(
                &JsonQuery::new("storage_device")
                    .equals(disk.disk_type.as_str(), &[disk.mount_point.as_str(), "disk_type"]),
            )?;
        }
    }

    if !detail.labels.is_empty() {
        let labels: Vec<&str> = detail.labels.iter().map(String::as_str).collect();
        filter = filter.and_json(&JsonQuery::new("labels").contains(&labels))?;
    }

    if !detail.os_type.is_empty() {
        filter = filter.eq_ignore_case("os_type", &detail.os_type);
    }
    filter = filter.in_list("os_name", &detail.os_names, detail.exclude_os_name);

    Ok(filter)
}

/// Full `SELECT` of candidate machines for `detail`, ordered by host id.
///
/// # Errors
///
/// Propagates [`QueryError`] from [`candidate_filter`].
pub fn candidate_select(detail: &ObjectDetail, for_biz_id: i64) -> Result<SqlFragment, QueryError> {
    let filter = candidate_filter(detail, for_biz_id)?.build();
    Ok(SqlFragment::new(
        format!(
            "SELECT * FROM {} WHERE {} ORDER BY {}",
            quote_ident(DETAIL_TABLE),
            filter.sql,
            quote_ident("bk_host_id")
        ),
        filter.args,
    ))
}
