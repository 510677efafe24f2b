//! Runtime: run one operator stage over partitioned input.
//!
//! Behavior:
//! - One operator instance per partition, built by the caller's factory.
//! - At most `max_parallel_tasks` workers; each pulls the next pending
//!   partition as soon as it finishes its current one.
//! - `prepare` once per instance; a failure aborts the whole stage.
//! - `operate` per record, in input order, on the partition's own thread.
//! - Operator errors (strict policy) abort the stage; lenient skips never do.
//!   Workers stop pulling new partitions once one has failed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use serde::Serialize;
use thiserror::Error;

use mapcat_core::config::EngineConfig;
use mapcat_core::prelude::{PartitionId, Record};
use mapcat_operators::{OpContext, OpError, Operator, OperatorStats};

use crate::metrics::emit_partition_stats;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("prepare failed on {partition}: {source}")]
    Prepare {
        partition: PartitionId,
        #[source]
        source: OpError,
    },
    #[error("operator failed on {partition}: {source}")]
    Operator {
        partition: PartitionId,
        #[source]
        source: OpError,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("worker for {0} panicked")]
    WorkerPanicked(PartitionId),
}

/// Output of one partition.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionOutput {
    pub partition: PartitionId,
    pub records: Vec<Record>,
    pub stats: OperatorStats,
}

/// Output of a whole stage, partitions in ascending order.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutput {
    pub partitions: Vec<PartitionOutput>,
    pub stats: OperatorStats,
}

impl StageOutput {
    /// All emitted records, partition by partition.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.partitions.iter().flat_map(|p| p.records.iter())
    }

    pub fn into_records(self) -> Vec<Record> {
        self.partitions
            .into_iter()
            .flat_map(|p| p.records.into_iter())
            .collect()
    }
}

pub struct Engine {
    cfg: EngineConfig,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Result<Self, ExecError> {
        cfg.validate()
            .map_err(|e| ExecError::Invalid(e.to_string()))?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Run a stage: partition `i` of `partitions` is processed by
    /// `make_op(PartitionId(i))`.
    pub fn run_stage<O, F>(
        &self,
        make_op: F,
        partitions: Vec<Vec<Record>>,
    ) -> Result<StageOutput, ExecError>
    where
        O: Operator,
        F: Fn(PartitionId) -> O + Sync,
    {
        let num_partitions = partitions.len();
        let queue: Mutex<VecDeque<(PartitionId, Vec<Record>)>> = Mutex::new(
            partitions
                .into_iter()
                .enumerate()
                .map(|(i, records)| (PartitionId::new(i as u64), records))
                .collect(),
        );
        let slots: Mutex<Vec<TaskState>> =
            Mutex::new((0..num_partitions).map(|_| TaskState::Pending).collect());
        let failed = AtomicBool::new(false);
        let workers = self.cfg.max_parallel_tasks.min(num_partitions);

        thread::scope(|scope| {
            let (queue, slots, failed, make_op) = (&queue, &slots, &failed, &make_op);
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || {
                        while !failed.load(Ordering::Relaxed) {
                            let next = lock(queue).pop_front();
                            let Some((partition, records)) = next else {
                                break;
                            };
                            let index = partition.get() as usize;
                            lock(slots)[index] = TaskState::Running;

                            let result =
                                run_partition(make_op(partition), partition, num_partitions, records);
                            if result.is_err() {
                                failed.store(true, Ordering::Relaxed);
                            }
                            lock(slots)[index] = TaskState::Done(result);
                        }
                    })
                })
                .collect();

            // A panicked worker leaves its partition `Running`.
            for handle in handles {
                let _ = handle.join();
            }
        });

        let states = slots.into_inner().unwrap_or_else(PoisonError::into_inner);
        let mut outputs: Vec<PartitionOutput> = Vec::with_capacity(num_partitions);
        let mut total = OperatorStats::default();
        for (index, state) in states.into_iter().enumerate() {
            match state {
                TaskState::Done(result) => {
                    let out = result?;
                    total += out.stats;
                    outputs.push(out);
                }
                TaskState::Running => {
                    return Err(ExecError::WorkerPanicked(PartitionId::new(index as u64)))
                }
                // Only left behind after another partition failed.
                TaskState::Pending => {}
            }
        }

        Ok(StageOutput {
            partitions: outputs,
            stats: total,
        })
    }
}

enum TaskState {
    Pending,
    Running,
    Done(Result<PartitionOutput, ExecError>),
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_partition<O: Operator>(
    op: O,
    partition: PartitionId,
    num_partitions: usize,
    records: Vec<Record>,
) -> Result<PartitionOutput, ExecError> {
    let ctx = OpContext::new(partition, num_partitions);
    op.prepare(&ctx)
        .map_err(|source| ExecError::Prepare { partition, source })?;

    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    for record in &records {
        op.operate(&ctx, record, &mut out)
            .map_err(|source| ExecError::Operator { partition, source })?;
    }

    let stats = op.stats();
    emit_partition_stats(op.name(), partition, &stats);

    Ok(PartitionOutput {
        partition,
        records: out,
        stats,
    })
}

/// Deal `records` into `n` partitions, record `i` going to partition `i % n`.
pub fn split_round_robin(records: Vec<Record>, n: usize) -> Vec<Vec<Record>> {
    let n = n.max(1);
    let mut parts: Vec<Vec<Record>> = (0..n).map(|_| Vec::new()).collect();
    for (i, record) in records.into_iter().enumerate() {
        parts[i % n].push(record);
    }
    parts
}
