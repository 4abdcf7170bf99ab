//! Observer protocol: read-only side channel on operator outputs.
//!
//! `Node::process` hands every attached observer the operator and its outputs.
//! `Observer::observe` is the gate: only functional operators reach
//! `on_output`, so observers attached to a whole pipeline see the leaves it
//! wraps and never the containers themselves.

use std::sync::Mutex;

use tabflow_core::types::Value;

use crate::traits::Operator;

pub trait Observer: Send + Sync {
    /// Entry point called after an operator runs.
    fn observe(&self, operator: &dyn Operator, outputs: &[Value]) {
        if operator.is_functional() {
            self.on_output(operator, outputs);
        }
    }

    /// Concrete observation logic. Must not affect what the caller receives.
    fn on_output(&self, operator: &dyn Operator, outputs: &[Value]);
}

/// Logs a one-line summary of each observed output through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_output(&self, operator: &dyn Operator, outputs: &[Value]) {
        let first = outputs.first().map(Value::summary).unwrap_or_else(|| "<none>".into());
        tracing::info!(operator = operator.name(), outputs = outputs.len(), %first, "observed");
    }
}

/// One call seen by a `RecordingObserver`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub operator: String,
    pub outputs: Vec<Value>,
}

/// Keeps a copy of everything it observes; handy for reports and tests.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<Observation>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self) -> Vec<Observation> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Observed operator names, in call order.
    pub fn operators(&self) -> Vec<String> {
        self.observations().into_iter().map(|o| o.operator).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut s) = self.seen.lock() {
            s.clear();
        }
    }
}

impl Observer for RecordingObserver {
    fn on_output(&self, operator: &dyn Operator, outputs: &[Value]) {
        if let Ok(mut s) = self.seen.lock() {
            s.push(Observation {
                operator: operator.name().to_string(),
                outputs: outputs.to_vec(),
            });
        }
    }
}
