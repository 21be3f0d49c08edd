//! The `code/message/data` envelope every dbrms surface answers with.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Envelope status codes.
pub mod codes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 1;
    pub const INSUFFICIENT_RESOURCE: i32 = 2;
    pub const LOCK_BUSY: i32 = 3;
    pub const INTERNAL: i32 = 500;
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Response<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,
}

impl<T> Response<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            code: codes::OK,
            message: String::from("OK"),
            data: Some(data),
            request_id: String::new(),
        }
    }

    #[must_use]
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            request_id: String::new(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == codes::OK
    }
}

/// A detail in allocation order, as printed by `dbrms sort`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SortedDetail {
    pub group_mark: String,
    pub priority: i64,
    pub affinity: String,
    pub count: u32,
}

/// Human readable apply summary, as printed by `dbrms message`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ApplySummary {
    pub summary: String,
    pub lock_key: String,
    pub affinities: Vec<String>,
    pub groups: Vec<String>,
}
