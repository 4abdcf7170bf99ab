//! Compose: run every child on the same inputs and collect each full output.

use tabflow_core::config::ExecConfig;
use tabflow_core::error::{Error, Result};
use tabflow_core::types::Value;
use tabflow_exec::{fan_out, Task};

use crate::traits::{Node, Operator};

pub struct Compose {
    branches: Vec<Node>,
    workers: usize,
    threshold: usize,
}

impl Compose {
    pub fn new(branches: Vec<Node>) -> Result<Self> {
        if branches.is_empty() {
            return Err(Error::Config("Compose needs at least one branch".into()));
        }
        let cfg = ExecConfig::default();
        Ok(Self {
            branches,
            workers: cfg.workers,
            threshold: cfg.parallel_threshold,
        })
    }

    /// Dispatch branches to the worker pool when `workers` is above the threshold.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_config(mut self, cfg: &ExecConfig) -> Self {
        self.workers = cfg.workers;
        self.threshold = cfg.parallel_threshold;
        self
    }
}

impl Operator for Compose {
    fn name(&self) -> &str {
        "Compose"
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let routed = self
            .branches
            .iter()
            .map(|b| (b.clone(), inputs.clone()))
            .collect();
        run_branches(routed, self.workers, self.threshold)
    }

    fn is_functional(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Node> {
        self.branches.clone()
    }
}

/// Process each `(node, inputs)` pair and wrap every output tuple in a
/// `Value::List`, keeping declaration order.
pub(crate) fn run_branches(
    routed: Vec<(Node, Vec<Value>)>,
    workers: usize,
    threshold: usize,
) -> Result<Vec<Value>> {
    tracing::trace!(branches = routed.len(), workers, "dispatching branches");
    let tasks: Vec<Task<Value>> = routed
        .into_iter()
        .map(|(node, inputs)| -> Task<Value> { Box::new(move || node.process(inputs).map(Value::List)) })
        .collect();
    fan_out(tasks, workers, threshold)
}
