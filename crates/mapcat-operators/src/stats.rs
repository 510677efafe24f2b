//! Per-instance record counters.
//!
//! Counters are relaxed atomics: an instance is driven by one worker, and
//! readers only need an eventually-consistent view.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Snapshot of an operator's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorStats {
    /// Records handed to `operate`.
    pub records_in: u64,
    /// Records emitted to the collector.
    pub records_out: u64,
    /// Records whose processing failed (lenient policy drops them).
    pub records_skipped: u64,
}

impl AddAssign for OperatorStats {
    fn add_assign(&mut self, rhs: Self) {
        self.records_in += rhs.records_in;
        self.records_out += rhs.records_out;
        self.records_skipped += rhs.records_skipped;
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    records_in: AtomicU64,
    records_out: AtomicU64,
    records_skipped: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_in(&self) {
        self.records_in.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_out(&self) {
        self.records_out.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.records_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> OperatorStats {
        OperatorStats {
            records_in: self.records_in.load(Ordering::Relaxed),
            records_out: self.records_out.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_snapshot_and_sum() {
        let c = StatsCounters::default();
        c.record_in();
        c.record_in();
        c.record_out();
        c.record_skipped();

        let mut total = c.snapshot();
        assert_eq!(
            total,
            OperatorStats {
                records_in: 2,
                records_out: 1,
                records_skipped: 1
            }
        );

        total += c.snapshot();
        assert_eq!(total.records_in, 4);
        assert_eq!(total.records_skipped, 2);
    }
}
