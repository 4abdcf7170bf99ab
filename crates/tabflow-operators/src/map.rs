//! Map and MapIterable: apply one child to many values.
//!
//! `Map` treats its inputs as N positional values and unwraps the child's
//! single output per value. `MapIterable` takes exactly one input, a
//! collection, and keeps the child's full output tuple per element.

use tabflow_core::error::{Error, Result};
use tabflow_core::types::Value;

use crate::traits::{single_output, Node, Operator};

pub struct Map {
    op: Node,
}

impl Map {
    pub fn new(op: Node) -> Self {
        Self { op }
    }
}

impl Operator for Map {
    fn name(&self) -> &str {
        "Map"
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        inputs
            .into_iter()
            .map(|input| single_output("Map", self.op.process(vec![input])?))
            .collect()
    }

    fn children(&self) -> Vec<Node> {
        vec![self.op.clone()]
    }
}

pub struct MapIterable {
    op: Node,
}

impl MapIterable {
    pub fn new(op: Node) -> Self {
        Self { op }
    }
}

impl Operator for MapIterable {
    fn name(&self) -> &str {
        "MapIterable"
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        match inputs {
            [Value::List(_)] => Ok(()),
            [other] => Err(Error::validation(
                "MapIterable",
                format!("expected a collection, got {}", other.summary()),
            )),
            _ => Err(Error::validation(
                "MapIterable",
                format!("expected exactly one collection input, got {} inputs", inputs.len()),
            )),
        }
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let items = inputs
            .into_iter()
            .next()
            .and_then(Value::into_list)
            .ok_or_else(|| Error::validation("MapIterable", "expected a collection input"))?;

        items
            .into_iter()
            .map(|item| self.op.process(vec![item]).map(Value::List))
            .collect()
    }

    fn children(&self) -> Vec<Node> {
        vec![self.op.clone()]
    }
}
