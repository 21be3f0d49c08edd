//! Affinity rules, host status and operation types.
//!
//! Wire names follow the resource-pool service: affinities are upper-case
//! (including the historical `SWTICH` / `CROS` spellings, with the corrected
//! spellings accepted as aliases), statuses are `PascalCase`, operation types
//! are `snake_case`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Affinity
// ---------------------------------------------------------------------------

/// Placement constraint for the hosts of one apply group.
///
/// ```text
/// SAME_SUBZONE_CROSS_SWTICH  same city, same sub-zone, distinct racks and switches
/// SAME_SUBZONE               same city, same sub-zone
/// CROS_SUBZONE               same city, at least two sub-zones
/// MAX_EACH_ZONE_EQUAL        spread as evenly as possible over sub-zones
/// CROSS_RACK                 distinct racks
/// NONE                       no constraint
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    JsonSchema,
)]
pub enum Affinity {
    #[serde(rename = "SAME_SUBZONE_CROSS_SWTICH", alias = "SAME_SUBZONE_CROSS_SWITCH")]
    SameSubzoneCrossSwitch,
    #[serde(rename = "SAME_SUBZONE")]
    SameSubzone,
    #[serde(rename = "CROS_SUBZONE", alias = "CROSS_SUBZONE")]
    CrossSubzone,
    #[serde(rename = "MAX_EACH_ZONE_EQUAL")]
    MaxEachZoneEqual,
    #[serde(rename = "CROSS_RACK")]
    CrossRack,
    #[default]
    #[serde(rename = "NONE", alias = "")]
    None,
}

impl Affinity {
    /// Return the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SameSubzoneCrossSwitch => "SAME_SUBZONE_CROSS_SWTICH",
            Self::SameSubzone => "SAME_SUBZONE",
            Self::CrossSubzone => "CROS_SUBZONE",
            Self::MaxEachZoneEqual => "MAX_EACH_ZONE_EQUAL",
            Self::CrossRack => "CROSS_RACK",
            Self::None => "NONE",
        }
    }

    /// Human readable description used in apply failure messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::SameSubzoneCrossSwitch => "same city, same sub-zone, cross switch and rack",
            Self::SameSubzone => "same city, same sub-zone",
            Self::CrossSubzone => "same city, cross sub-zone",
            Self::MaxEachZoneEqual => "spread evenly across sub-zones",
            Self::CrossRack => "cross rack",
            Self::None => "NONE",
        }
    }

    /// Whether the rule can only be checked against a chosen city.
    #[must_use]
    pub const fn requires_location(self) -> bool {
        matches!(
            self,
            Self::SameSubzoneCrossSwitch | Self::SameSubzone | Self::CrossSubzone
        )
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HostStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a machine inside the resource pool.
///
/// ```text
/// Unused → Preselected → Used
///        → Used
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum HostStatus {
    #[default]
    Unused,
    Preselected,
    Used,
}

impl HostStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Unused => &[Self::Preselected, Self::Used],
            Self::Preselected => &[Self::Used, Self::Unused],
            Self::Used => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// `next` if the lifecycle allows it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] otherwise.
    pub fn transition_to(self, next: Self) -> Result<Self, CoreError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unused => "Unused",
            Self::Preselected => "Preselected",
            Self::Used => "Used",
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OperationType
// ---------------------------------------------------------------------------

/// Kind of change recorded in the operation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Consumed,
    Imported,
}

impl OperationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consumed => "consumed",
            Self::Imported => "imported",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affinity_wire_names_roundtrip() {
        for affinity in [
            Affinity::SameSubzoneCrossSwitch,
            Affinity::SameSubzone,
            Affinity::CrossSubzone,
            Affinity::MaxEachZoneEqual,
            Affinity::CrossRack,
            Affinity::None,
        ] {
            let json = serde_json::to_string(&affinity).unwrap();
            assert_eq!(json, format!("\"{}\"", affinity.as_str()));
            let back: Affinity = serde_json::from_str(&json).unwrap();
            assert_eq!(back, affinity);
        }
    }

    #[test]
    fn affinity_accepts_corrected_spellings_and_empty() {
        let a: Affinity = serde_json::from_str("\"SAME_SUBZONE_CROSS_SWITCH\"").unwrap();
        assert_eq!(a, Affinity::SameSubzoneCrossSwitch);
        let b: Affinity = serde_json::from_str("\"CROSS_SUBZONE\"").unwrap();
        assert_eq!(b, Affinity::CrossSubzone);
        let c: Affinity = serde_json::from_str("\"\"").unwrap();
        assert_eq!(c, Affinity::None);
    }

    #[test]
    fn affinity_rejects_unknown_value() {
        assert!(serde_json::from_str::<Affinity>("\"SAME_RACK\"").is_err());
    }

    #[test]
    fn host_status_transitions() {
        assert!(HostStatus::Unused.can_transition_to(HostStatus::Used));
        assert!(HostStatus::Preselected.can_transition_to(HostStatus::Unused));
        assert!(!HostStatus::Used.can_transition_to(HostStatus::Unused));
        assert_eq!(
            HostStatus::Unused.transition_to(HostStatus::Used),
            Ok(HostStatus::Used)
        );
        assert_eq!(
            HostStatus::Used.transition_to(HostStatus::Used),
            Err(CoreError::InvalidTransition {
                from: HostStatus::Used,
                to: HostStatus::Used,
            })
        );
    }
}
