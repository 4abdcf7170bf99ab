//! Sequence: chain children so each one's output feeds the next.

use tabflow_core::error::{Error, Result};
use tabflow_core::types::Value;

use crate::traits::{Node, Operator};

pub struct Sequence {
    steps: Vec<Node>,
}

impl Sequence {
    pub fn new(steps: Vec<Node>) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::Config("Sequence needs at least one step".into()));
        }
        Ok(Self { steps })
    }
}

impl Operator for Sequence {
    fn name(&self) -> &str {
        "Sequence"
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let mut values = inputs;
        for (i, step) in self.steps.iter().enumerate() {
            tracing::trace!(step = i, operator = step.name(), inputs = values.len(), "sequence step");
            values = step.process(values)?;
        }
        Ok(values)
    }

    fn is_functional(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Node> {
        self.steps.clone()
    }
}
