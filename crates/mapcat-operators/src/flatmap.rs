//! Flat-map ("mapcat") operator.
//!
//! Each input record is handed, as one argument list, to a function resolved
//! by name. The function returns a sequence; every element of it becomes one
//! output record, emitted in sequence order as soon as it is produced.
//!
//! Failures while processing a record are contained to that record. Under
//! `ErrorPolicy::Lenient` they are logged and counted, and the record is
//! skipped; under `ErrorPolicy::Strict` they are returned to the host.
//! Records emitted before a failing element stay emitted.

use std::sync::{Arc, OnceLock};

use mapcat_core::prelude::{EngineConfig, ErrorPolicy, Record, Schema};
use tracing::{debug, warn};

use crate::coerce::{Coercer, SeqCoercer};
use crate::dynamic::{DynFn, FnName, Resolver};
use crate::plan::OpPlan;
use crate::stats::{OperatorStats, StatsCounters};
use crate::traits::{Collector, OpContext, OpError, Operator, OperatorState, RecordError};

pub struct FlatMapOperator {
    output_schema: Schema,
    function: FnName,
    resolver: Arc<dyn Resolver>,
    coercer: Arc<dyn Coercer>,
    policy: ErrorPolicy,
    /// Set once by `prepare`; never replaced.
    bound: OnceLock<Arc<dyn DynFn>>,
    stats: StatsCounters,
}

impl FlatMapOperator {
    /// Build an unprepared operator. No lookup happens here.
    pub fn new(output_schema: Schema, function: FnName, resolver: Arc<dyn Resolver>) -> Self {
        Self {
            output_schema,
            function,
            resolver,
            coercer: Arc::new(SeqCoercer),
            policy: ErrorPolicy::default(),
            bound: OnceLock::new(),
            stats: StatsCounters::default(),
        }
    }

    /// Build from a textual function name and the engine config.
    ///
    /// A bare `name` is qualified with `cfg.default_namespace`; the error
    /// policy comes from `cfg.error_policy`. Nothing is resolved here.
    pub fn from_config(
        output_schema: Schema,
        function: &str,
        resolver: Arc<dyn Resolver>,
        cfg: &EngineConfig,
    ) -> Result<Self, OpError> {
        let function = FnName::parse_with_default(function, cfg.default_namespace.as_deref())?;
        Ok(Self::new(output_schema, function, resolver).with_policy(cfg.error_policy))
    }

    pub fn with_coercer(mut self, coercer: Arc<dyn Coercer>) -> Self {
        self.coercer = coercer;
        self
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn function(&self) -> &FnName {
        &self.function
    }

    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    fn expand(
        &self,
        f: &dyn DynFn,
        record: &Record,
        out: &mut dyn Collector,
    ) -> Result<(), RecordError> {
        let args = self.coercer.to_args(record).map_err(RecordError::Args)?;
        let result = f.apply(args).map_err(RecordError::Invoke)?;
        let seq = result.into_seq().map_err(RecordError::NotSeqable)?;

        for (index, element) in seq.enumerate() {
            let element = element.map_err(RecordError::Iterate)?;
            let emitted = self
                .coercer
                .to_record(element, &self.output_schema)
                .map_err(|source| RecordError::Element { index, source })?;
            out.add(emitted);
            self.stats.record_out();
        }
        Ok(())
    }

    fn on_record_error(&self, ctx: &OpContext, err: RecordError) -> Result<(), OpError> {
        self.stats.record_skipped();
        match self.policy {
            ErrorPolicy::Lenient => {
                warn!(
                    function = %self.function,
                    partition = %ctx.partition,
                    error = %err,
                    "skipping record"
                );
                Ok(())
            }
            ErrorPolicy::Strict => Err(OpError::Record {
                function: self.function.to_string(),
                source: err,
            }),
        }
    }
}

impl Operator for FlatMapOperator {
    fn name(&self) -> &'static str {
        "flat_map"
    }

    fn plan(&self, _input_schemas: &[Schema]) -> Result<OpPlan, OpError> {
        // Argument arity is whatever the input carries; only the output is declared.
        self.output_schema
            .validate()
            .map_err(|e| OpError::Plan(e.to_string()))?;
        Ok(OpPlan::new(self.output_schema.clone()).with_fan_out(true))
    }

    fn state(&self) -> OperatorState {
        if self.bound.get().is_some() {
            OperatorState::Ready
        } else {
            OperatorState::Unprepared
        }
    }

    fn prepare(&self, ctx: &OpContext) -> Result<(), OpError> {
        if self.bound.get().is_some() {
            return Ok(());
        }
        let f = self.resolver.resolve(&self.function)?;
        // Losing a race here means another caller bound the same name first.
        let _ = self.bound.set(f);
        debug!(function = %self.function, partition = %ctx.partition, "function bound");
        Ok(())
    }

    fn operate(
        &self,
        ctx: &OpContext,
        record: &Record,
        out: &mut dyn Collector,
    ) -> Result<(), OpError> {
        let f = self.bound.get().ok_or(OpError::NotPrepared)?;
        self.stats.record_in();
        match self.expand(f.as_ref(), record, out) {
            Ok(()) => Ok(()),
            Err(err) => self.on_record_error(ctx, err),
        }
    }

    fn stats(&self) -> OperatorStats {
        self.stats.snapshot()
    }
}
