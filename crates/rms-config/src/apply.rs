//! Apply request limits and defaults.

use serde::{Deserialize, Serialize};

const fn default_max_details() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplyConfig {
    /// Resource type used when a request leaves `resource_type` empty.
    #[serde(default)]
    pub default_resource_type: String,

    /// Upper bound on the number of groups in one request.
    #[serde(default = "default_max_details")]
    pub max_details: usize,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            default_resource_type: String::new(),
            max_details: default_max_details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ApplyConfig::default();
        assert!(config.default_resource_type.is_empty());
        assert_eq!(config.max_details, 100);
    }
}
