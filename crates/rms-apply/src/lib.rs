//! # rms-apply
//!
//! Serving apply requests against the resource pool.
//!
//! - [`param_check`]: reject requests no pool could satisfy
//! - [`sort_details`]: serve specific groups before generic ones
//! - [`allocate`]: affinity-aware matching of groups against pool hosts
//! - [`build_message`] / [`failure_message`]: human readable summaries
//! - [`lock_key`] / [`lock::acquire`]: serialise applies per business
//! - [`store`]: pool file and operation log persistence

mod allocate;
mod error;
pub mod lock;
mod message;
mod order;
mod queue;
pub mod store;
mod validate;

pub use allocate::{allocate, matches, pick};
pub use error::ApplyError;
pub use message::{build_message, disk_match_info, failure_message, lock_key};
pub use order::{all_affinities, priority, sort_details, sorted_indices};
pub use queue::PriorityQueue;
pub use validate::{param_check, param_check_with_limit};
