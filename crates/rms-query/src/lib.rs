//! # rms-query
//!
//! SQL clause building for the resource pool.
//!
//! - [`JsonQuery`]: predicates over MySQL JSON columns (`JSON_EXTRACT`,
//!   `JSON_CONTAINS`, `JSON_KEYS`)
//! - [`Filter`]: AND/OR combination of predicates with positional arguments
//! - [`candidate_filter`] / [`candidate_select`]: the query that selects pool
//!   machines able to serve one apply group

mod error;
mod filter;
mod fragment;
mod json;

pub use error::QueryError;
pub use filter::{DETAIL_TABLE, Filter, candidate_filter, candidate_select};
pub use fragment::{SqlFragment, SqlValue, escape_literal, quote_ident};
pub use json::{Dialect, JsonQuery, key_path};
