//! Cross-cutting error types for dbrms.
//!
//! Domain-specific errors (`ApplyError`, `QueryError`, `ConfigError`) live in
//! their respective crates and converge into `anyhow` in `rms-cli`.

use thiserror::Error;

use crate::enums::HostStatus;

/// Errors raised by the core types themselves.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A host status change outside the status lifecycle.
    #[error("Invalid host status transition: {from} -> {to}")]
    InvalidTransition { from: HostStatus, to: HostStatus },
}
