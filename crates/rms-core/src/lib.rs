//! # rms-core
//!
//! Core types and error types for the dbrms resource-pool apply engine.
//!
//! This crate provides the foundational types shared across all dbrms crates:
//! - Apply request structs (details, specs, location and disk constraints)
//! - Host records of the resource pool and allocation results
//! - Affinity, host status and operation enums
//! - The `code/message/data` response envelope
//! - Host attribute normalisation (OS names, switch-derived net device ids)
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod hostinfo;
pub mod model;
pub mod responses;
