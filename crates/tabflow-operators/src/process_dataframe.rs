//! ProcessDataframe: apply a sub-pipeline to selected input positions only.

use tabflow_core::error::{Error, Result};
use tabflow_core::types::Value;

use crate::traits::{single_output, Node, Operator};

/// Replaces each selected input with the sub-pipeline's single output for it;
/// every other position passes through untouched.
pub struct ProcessDataframe {
    op: Node,
    indices: Vec<usize>,
}

impl ProcessDataframe {
    pub fn new(op: Node, indices: Vec<usize>) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::Config("ProcessDataframe needs at least one index".into()));
        }
        let mut seen = indices.clone();
        seen.sort_unstable();
        if seen.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::Config(format!("ProcessDataframe indices repeat: {indices:?}")));
        }
        Ok(Self { op, indices })
    }

    pub fn at(op: Node, index: usize) -> Self {
        Self {
            op,
            indices: vec![index],
        }
    }
}

impl Operator for ProcessDataframe {
    fn name(&self) -> &str {
        "ProcessDataframe"
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        match self.indices.iter().find(|&&idx| idx >= inputs.len()) {
            Some(&bad) => Err(Error::index_out_of_range("ProcessDataframe", bad, inputs.len())),
            None => Ok(()),
        }
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let mut values = inputs;
        for &idx in &self.indices {
            let selected = std::mem::replace(&mut values[idx], Value::List(Vec::new()));
            values[idx] = single_output("ProcessDataframe", self.op.process(vec![selected])?)?;
        }
        Ok(values)
    }

    fn children(&self) -> Vec<Node> {
        vec![self.op.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::FnOperator;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tabflow_core::types::{Column, Scalar, Table};

    fn table(name: &str, v: i64) -> Value {
        Value::Table(Table::new(vec![Column::new(name, vec![Scalar::I64(v)])]))
    }

    fn rename_to(new_name: &'static str, calls: Arc<AtomicUsize>) -> Node {
        Node::new(FnOperator::each("rename", move |v| {
            calls.fetch_add(1, Ordering::SeqCst);
            match v {
                Value::Table(mut t) => {
                    for c in &mut t.columns {
                        c.name = new_name.to_string();
                    }
                    Ok(Value::Table(t))
                }
                other => Ok(other),
            }
        }))
    }

    #[test]
    fn only_selected_positions_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let op = Node::new(ProcessDataframe::new(rename_to("hr", calls.clone()), vec![2, 0]).unwrap());

        let out = op
            .process(vec![table("a", 1), table("b", 2), table("c", 3)])
            .unwrap();
        assert_eq!(out, vec![table("hr", 1), table("b", 2), table("hr", 3)]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn out_of_range_index_fails_before_any_work() {
        let calls = Arc::new(AtomicUsize::new(0));
        let op = Node::new(ProcessDataframe::new(rename_to("hr", calls.clone()), vec![0, 5]).unwrap());

        let inputs = vec![table("a", 1), table("b", 2)];
        let snapshot = inputs.clone();
        match op.process(inputs) {
            Err(Error::IndexOutOfRange { index, len, .. }) => assert_eq!((index, len), (5, 2)),
            other => panic!("expected index error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(snapshot, vec![table("a", 1), table("b", 2)]);
    }

    #[test]
    fn empty_or_repeated_indices_are_config_errors() {
        let calls = Arc::new(AtomicUsize::new(0));
        assert!(matches!(
            ProcessDataframe::new(rename_to("x", calls.clone()), vec![]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ProcessDataframe::new(rename_to("x", calls), vec![1, 1]),
            Err(Error::Config(_))
        ));
    }
}
