#![forbid(unsafe_code)]
//! mapcat-operators: the flat-map operator and the seams it runs against.
//!
//! Design intent:
//! - Keep this crate pure and synchronous (no async, no threads).
//! - The function runtime is reached only through `Resolver` (lookup) and
//!   `DynFn` (invocation); records cross into it only through `Coercer`.
//! - Operators are `Send + Sync` so a host can place one per partition and
//!   drive each from its own worker.

pub mod coerce;
pub mod dynamic;
pub mod flatmap;
pub mod plan;
pub mod stats;
pub mod traits;

pub use coerce::{CoerceError, Coercer, SeqCoercer};
pub use dynamic::{DynFn, FnName, LazySeq, Registry, ResolveError, Resolver, RuntimeError, Value};
pub use flatmap::FlatMapOperator;
pub use plan::OpPlan;
pub use stats::OperatorStats;
pub use traits::{Collector, OpContext, OpError, Operator, OperatorState, RecordError};
