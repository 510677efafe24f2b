#![forbid(unsafe_code)]
//! mapcat-exec: a small host that runs one operator instance per partition.
//!
//! Each partition gets a fresh instance, prepared once and then fed its
//! records in order. Partitions run on scoped threads, at most
//! `max_parallel_tasks` at a time.

pub mod metrics;
pub mod runtime;

pub use runtime::{split_round_robin, Engine, ExecError, PartitionOutput, StageOutput};
