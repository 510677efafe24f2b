//! Operator trait + common interfaces.
//!
//! A host calls `plan(...)` to learn the output schema, `prepare(...)` once
//! per instance, then `operate(...)` once per input record, strictly in
//! sequence. `eval_block(...)` is the same loop over a columnar block.

use mapcat_core::prelude::{PartitionId, Record, RowBatch, Schema};
use thiserror::Error;

use crate::coerce::CoerceError;
use crate::dynamic::{ResolveError, RuntimeError};
use crate::plan::OpPlan;
use crate::stats::OperatorStats;

#[derive(Debug, Error)]
pub enum OpError {
    #[error("planning error: {0}")]
    Plan(String),

    #[error("cannot resolve function: {0}")]
    Resolve(#[from] ResolveError),

    #[error("operate called before prepare")]
    NotPrepared,

    #[error("record failed in {function}: {source}")]
    Record {
        function: String,
        #[source]
        source: RecordError,
    },

    #[error(transparent)]
    Core(#[from] mapcat_core::Error),
}

/// Why one input record produced no (or only partial) output.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("argument coercion: {0}")]
    Args(#[source] CoerceError),

    #[error("invocation: {0}")]
    Invoke(#[source] RuntimeError),

    #[error("result is a {0}, not a sequence")]
    NotSeqable(&'static str),

    #[error("result sequence: {0}")]
    Iterate(#[source] RuntimeError),

    #[error("result element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: CoerceError,
    },
}

/// Where an operator instance runs. Opaque to operators beyond logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpContext {
    pub partition: PartitionId,
    pub num_partitions: usize,
}

impl OpContext {
    pub fn new(partition: PartitionId, num_partitions: usize) -> Self {
        Self {
            partition,
            num_partitions,
        }
    }

    /// Context for an unpartitioned run.
    pub fn single() -> Self {
        Self::new(PartitionId::new(0), 1)
    }
}

/// Downstream sink for emitted records.
pub trait Collector {
    fn add(&mut self, record: Record);
}

impl Collector for Vec<Record> {
    fn add(&mut self, record: Record) {
        self.push(record);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorState {
    Unprepared,
    Ready,
}

/// Trait that all operators must implement.
///
/// Invariants:
/// - `prepare` happens-before any `operate` on the same instance.
/// - `operate` calls on one instance never overlap.
pub trait Operator: Send + Sync {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    /// Given input schemas, return the plan with the output schema.
    fn plan(&self, input_schemas: &[Schema]) -> Result<OpPlan, OpError>;

    fn state(&self) -> OperatorState;

    fn prepare(&self, ctx: &OpContext) -> Result<(), OpError>;

    /// Process one input record, emitting zero or more records to `out`.
    fn operate(
        &self,
        ctx: &OpContext,
        record: &Record,
        out: &mut dyn Collector,
    ) -> Result<(), OpError>;

    fn stats(&self) -> OperatorStats {
        OperatorStats::default()
    }

    /// Run `operate` over every row of `input` and gather the outputs into a
    /// block laid out by the plan's output schema.
    fn eval_block(&self, ctx: &OpContext, input: &RowBatch) -> Result<RowBatch, OpError> {
        let input_schema = Schema::of_names(input.columns.iter().map(|c| c.name.clone()));
        let plan = self.plan(&[input_schema])?;

        let mut out: Vec<Record> = Vec::with_capacity(input.num_rows());
        for record in input.records()? {
            self.operate(ctx, &record, &mut out)?;
        }

        Ok(RowBatch::from_records(&plan.output_schema, out)?)
    }
}
