//! Metrics/tracing hooks.
//!
//! This module purposefully avoids pulling heavy telemetry stacks.
//! Wire these up to OpenTelemetry/Prometheus in the binary layer.

use mapcat_core::prelude::PartitionId;
use mapcat_operators::OperatorStats;

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::span!(tracing::Level::TRACE, "mapcat", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}

/// Report one finished partition.
pub fn emit_partition_stats(operator: &str, partition: PartitionId, stats: &OperatorStats) {
    emit_span(
        "partition_done",
        &[
            ("operator", operator.to_string()),
            ("partition", partition.get().to_string()),
            ("records_in", stats.records_in.to_string()),
            ("records_out", stats.records_out.to_string()),
            ("records_skipped", stats.records_skipped.to_string()),
        ],
    );
}
