//! Tracing hooks for dispatch timing.
//!
//! Binaries decide where these events go through their `tracing` subscriber.

use std::time::Duration;

pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("tabflow", event);
    let _enter = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

pub fn record_fan_out(tasks: usize, workers: usize, elapsed: Duration) {
    tracing::debug!(tasks, workers, elapsed_ms = elapsed.as_millis() as u64, "parallel fan-out finished");
    emit_span(
        "fan_out",
        &[("tasks", tasks.to_string()), ("workers", workers.to_string())],
    );
}
