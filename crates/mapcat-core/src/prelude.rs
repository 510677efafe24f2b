//! Convenient re-exports for downstream crates.

pub use crate::config::{EngineConfig, ErrorPolicy};
pub use crate::error::{Error, Result};
pub use crate::id::PartitionId;
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, Record, RowBatch, Scalar};
