//! Left folds over the input tuple.
//!
//! `Reduce` folds with a binary child operator; `ReduceProcessing` folds with
//! a plain `Reducer` function instead of another operator.

use tabflow_core::error::{Error, Result};
use tabflow_core::types::Value;

use crate::traits::{single_output, Node, Operator};

/// `acc = op.process([acc, next])[0]`, left to right.
///
/// Without a seed the first input is the initial accumulator and at least
/// two inputs are required.
pub struct Reduce {
    op: Node,
    seed: Option<Value>,
}

impl Reduce {
    pub fn new(op: Node) -> Self {
        Self { op, seed: None }
    }

    pub fn with_seed(mut self, seed: Value) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Operator for Reduce {
    fn name(&self) -> &str {
        "Reduce"
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        if self.seed.is_none() && inputs.len() < 2 {
            return Err(Error::validation(
                "Reduce",
                format!("needs at least 2 inputs without a seed, got {}", inputs.len()),
            ));
        }
        Ok(())
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let mut rest = inputs.into_iter();
        let mut acc = match &self.seed {
            Some(seed) => seed.clone(),
            None => rest
                .next()
                .ok_or_else(|| Error::validation("Reduce", "no inputs to reduce"))?,
        };
        for next in rest {
            acc = single_output("Reduce", self.op.process(vec![acc, next])?)?;
        }
        Ok(vec![acc])
    }

    fn children(&self) -> Vec<Node> {
        vec![self.op.clone()]
    }
}

/// Element-wise reduction function: `(element, accumulated) -> accumulated'`.
pub trait Reducer: Send + Sync + 'static {
    fn reduce(&self, element: Value, accumulated: Value) -> Result<Value>;
}

impl<F> Reducer for F
where
    F: Fn(Value, Value) -> Result<Value> + Send + Sync + 'static,
{
    fn reduce(&self, element: Value, accumulated: Value) -> Result<Value> {
        self(element, accumulated)
    }
}

/// Fold the inputs with a user-supplied `Reducer`.
///
/// Without an initial accumulator the first input takes its place, so at
/// least one input is required.
pub struct ReduceProcessing<R> {
    name: String,
    reducer: R,
    initial: Option<Value>,
}

impl<R: Reducer> ReduceProcessing<R> {
    pub fn new(name: impl Into<String>, reducer: R) -> Self {
        Self {
            name: name.into(),
            reducer,
            initial: None,
        }
    }

    pub fn with_initial(mut self, initial: Value) -> Self {
        self.initial = Some(initial);
        self
    }
}

impl<R: Reducer> Operator for ReduceProcessing<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        if self.initial.is_none() && inputs.is_empty() {
            return Err(Error::validation(
                self.name.clone(),
                "needs at least 1 input without an initial value",
            ));
        }
        Ok(())
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let mut rest = inputs.into_iter();
        let mut acc = match &self.initial {
            Some(init) => init.clone(),
            None => rest
                .next()
                .ok_or_else(|| Error::validation(self.name.clone(), "no inputs to reduce"))?,
        };
        for element in rest {
            acc = self.reducer.reduce(element, acc)?;
        }
        Ok(vec![acc])
    }
}
