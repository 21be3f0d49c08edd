use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An inclusive numeric range. `0` in `max` leaves the range open-ended.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MeasureRange {
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: u32,
}

impl MeasureRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Neither bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min == 0 && self.max == 0
    }

    /// Both bounds are set.
    #[must_use]
    pub const fn is_not_empty(&self) -> bool {
        self.min > 0 && self.max > 0
    }

    #[must_use]
    pub const fn is_legal(&self) -> bool {
        self.max == 0 || self.min <= self.max
    }

    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && (self.max == 0 || value <= self.max)
    }
}

/// CPU cores and memory (MB) wanted per host.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Spec {
    #[serde(default)]
    pub cpu: MeasureRange,
    #[serde(default)]
    pub mem: MeasureRange,
}

impl Spec {
    #[must_use]
    pub const fn not_empty(&self) -> bool {
        !self.cpu.is_empty() || !self.mem.is_empty()
    }
}

/// One disk requirement. Sizes are in GB.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DiskSpec {
    #[serde(default)]
    pub disk_type: String,
    #[serde(default, rename = "min")]
    pub min_size: u32,
    #[serde(default, rename = "max")]
    pub max_size: u32,
    #[serde(default)]
    pub mount_point: String,
}

impl DiskSpec {
    #[must_use]
    pub const fn is_legal(&self) -> bool {
        !(self.max_size > 0 && self.min_size > self.max_size)
    }

    #[must_use]
    pub const fn size_range(&self) -> MeasureRange {
        MeasureRange::new(self.min_size, self.max_size)
    }

    /// Short human summary, e.g. `mount point: /data disk type: SSD size: 100 ~ 500 G`.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.mount_point.is_empty() {
            parts.push(format!("mount point: {}", self.mount_point));
        }
        if !self.disk_type.is_empty() {
            parts.push(format!("disk type: {}", self.disk_type));
        }
        match (self.min_size, self.max_size) {
            (min, max) if min > 0 && max > 0 => parts.push(format!("size: {min} ~ {max} G")),
            (0, max) if max > 0 => parts.push(format!("size <= {max} G")),
            (min, 0) if min > 0 => parts.push(format!("size >= {min} G")),
            _ => {}
        }
        parts.join(" ")
    }
}

/// City and sub-zone constraint of one apply group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LocationSpec {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub sub_zone_ids: Vec<String>,
    /// `true`: hosts must be in `sub_zone_ids`; `false`: hosts must not be.
    #[serde(default, alias = "include_or_exclue")]
    pub include_or_exclude: bool,
}

impl LocationSpec {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.trim().is_empty()
    }

    #[must_use]
    pub fn sub_zone_is_empty(&self) -> bool {
        self.is_empty() || self.sub_zone_ids.is_empty()
    }

    /// Whether a host in `sub_zone_id` satisfies the sub-zone list.
    #[must_use]
    pub fn admits(&self, sub_zone_id: &str) -> bool {
        if self.sub_zone_ids.is_empty() {
            return true;
        }
        let listed = self.sub_zone_ids.iter().any(|id| id == sub_zone_id);
        listed == self.include_or_exclude
    }
}
