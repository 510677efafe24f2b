#![forbid(unsafe_code)]
//! mapcat: a flat-map pipeline operator over a dynamic function runtime.
//!
//! Facade over the workspace crates; integration tests and benches build
//! against them.

pub use mapcat_core;
pub use mapcat_exec;
pub use mapcat_operators;
