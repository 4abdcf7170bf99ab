//! Execution configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    /// Worker count used by parallel-capable composites that don't set their own.
    pub workers: usize,

    /// Fan-out only happens when the requested worker count is above this value.
    pub parallel_threshold: usize,

    /// Rows shown by `Print` for the `head` inspection.
    pub print_rows: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            parallel_threshold: 1,
            print_rows: 5,
        }
    }
}

impl ExecConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `TABFLOW_WORKERS`: default worker count for Compose/Split
    /// - `TABFLOW_PARALLEL_THRESHOLD`: worker count at or below which calls stay sequential
    /// - `TABFLOW_PRINT_ROWS`: rows shown by `Print` head inspections
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("TABFLOW_WORKERS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.workers = v;
            }
        }

        if let Ok(s) = std::env::var("TABFLOW_PARALLEL_THRESHOLD") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.parallel_threshold = v;
            }
        }

        if let Ok(s) = std::env::var("TABFLOW_PRINT_ROWS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.print_rows = v;
            }
        }

        cfg
    }

    /// Whether `workers` is large enough to leave the sequential path.
    pub fn is_parallel(&self, workers: usize) -> bool {
        workers > self.parallel_threshold
    }
}
