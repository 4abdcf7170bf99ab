//! Iterate: run one child per input stream and flatten the results.
//!
//! Each input is a collection (typically the `[key, table]` pairs produced by
//! `Table::group_by`). Its elements become the child's argument tuple, and the
//! outputs of all streams are concatenated in input order.

use tabflow_core::error::{Error, Result};
use tabflow_core::types::Value;

use crate::traits::{Node, Operator};

pub struct Iterate {
    op: Node,
}

impl Iterate {
    pub fn new(op: Node) -> Self {
        Self { op }
    }
}

impl Operator for Iterate {
    fn name(&self) -> &str {
        "Iterate"
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        for (i, input) in inputs.iter().enumerate() {
            if input.as_list().is_none() {
                return Err(Error::validation(
                    "Iterate",
                    format!("input {i} is {}, expected a stream", input.summary()),
                ));
            }
        }
        Ok(())
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        for input in inputs {
            let items = input
                .into_list()
                .ok_or_else(|| Error::validation("Iterate", "expected a stream input"))?;
            out.extend(self.op.process(items)?);
        }
        Ok(out)
    }

    fn children(&self) -> Vec<Node> {
        vec![self.op.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::FnOperator;
    use tabflow_core::types::{Column, Scalar, Table};

    fn visits() -> Table {
        Table::new(vec![
            Column::new(
                "site",
                vec![
                    Scalar::Str("north".into()),
                    Scalar::Str("south".into()),
                    Scalar::Str("north".into()),
                ],
            ),
            Column::new("bmi", vec![Scalar::F64(21.5), Scalar::F64(30.1), Scalar::F64(24.0)]),
        ])
    }

    /// For every `[key, table]` pair in its arguments, emit `key:rows`.
    fn count_rows() -> Node {
        Node::new(FnOperator::new("count_rows", |pairs: Vec<Value>| {
            pairs
                .into_iter()
                .map(|pair| -> Result<Value> {
                    let items = pair.into_list().ok_or_else(|| Error::exec("count_rows", "not a pair"))?;
                    let rows = items[1].as_table().map(Table::num_rows).unwrap_or(0);
                    Ok(Value::Scalar(Scalar::Str(format!("{}:{}", items[0], rows))))
                })
                .collect()
        }))
    }

    #[test]
    fn flattens_outputs_in_input_order() {
        let grouped = visits().group_by("site").unwrap();
        let iterate = Node::new(Iterate::new(count_rows()));

        let out = iterate.process(vec![grouped.clone(), grouped]).unwrap();
        let labels: Vec<String> = out.iter().map(|v| v.to_string()).collect();
        assert_eq!(labels, vec!["north:2", "south:1", "north:2", "south:1"]);
    }

    #[test]
    fn rejects_plain_tables() {
        let iterate = Node::new(Iterate::new(count_rows()));
        assert!(matches!(
            iterate.process(vec![Value::Table(visits())]),
            Err(Error::Validation { .. })
        ));
    }
}
