#![forbid(unsafe_code)]
//! mapcat-core: records, schemas, ids, configs and the core error type.
//!
//! Pure data; no dynamic runtime and no I/O live here. The operator crate
//! builds on these types and the exec crate schedules operators over them.

pub mod config;
pub mod error;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
