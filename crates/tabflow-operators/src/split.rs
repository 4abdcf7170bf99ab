//! Split and SplitJoin: route inputs to branches, optionally joining after.
//!
//! Without a bind list branch `i` receives input `i`. With one, branch `i`
//! receives input `bind[i]`; the same input may feed several branches.

use tabflow_core::config::ExecConfig;
use tabflow_core::error::{Error, Result};
use tabflow_core::types::Value;

use crate::compose::run_branches;
use crate::traits::{Node, Operator};

pub struct Split {
    branches: Vec<Node>,
    bind: Option<Vec<usize>>,
    workers: usize,
    threshold: usize,
}

impl Split {
    pub fn new(branches: Vec<Node>) -> Result<Self> {
        if branches.is_empty() {
            return Err(Error::Config("Split needs at least one branch".into()));
        }
        let cfg = ExecConfig::default();
        Ok(Self {
            branches,
            bind: None,
            workers: cfg.workers,
            threshold: cfg.parallel_threshold,
        })
    }

    /// Route branch `i` to input `bind[i]`. One entry per branch.
    pub fn with_bind(mut self, bind: Vec<usize>) -> Result<Self> {
        if bind.len() != self.branches.len() {
            return Err(Error::Config(format!(
                "bind list has {} entries for {} branches",
                bind.len(),
                self.branches.len()
            )));
        }
        self.bind = Some(bind);
        Ok(self)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_config(mut self, cfg: &ExecConfig) -> Self {
        self.workers = cfg.workers;
        self.threshold = cfg.parallel_threshold;
        self
    }

    fn check_routes(&self, name: &str, inputs: &[Value]) -> Result<()> {
        match &self.bind {
            Some(bind) => {
                if let Some(&bad) = bind.iter().find(|&&idx| idx >= inputs.len()) {
                    return Err(Error::index_out_of_range(name, bad, inputs.len()));
                }
            }
            None => {
                if inputs.len() != self.branches.len() {
                    return Err(Error::validation(
                        name,
                        format!("{} input(s) for {} branches", inputs.len(), self.branches.len()),
                    ));
                }
            }
        }
        Ok(())
    }

    fn route(&self, inputs: Vec<Value>) -> Vec<(Node, Vec<Value>)> {
        match &self.bind {
            Some(bind) => self
                .branches
                .iter()
                .zip(bind)
                .map(|(b, &idx)| (b.clone(), vec![inputs[idx].clone()]))
                .collect(),
            None => self
                .branches
                .iter()
                .cloned()
                .zip(inputs)
                .map(|(b, input)| (b, vec![input]))
                .collect(),
        }
    }
}

impl Operator for Split {
    fn name(&self) -> &str {
        "Split"
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        self.check_routes("Split", inputs)
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        run_branches(self.route(inputs), self.workers, self.threshold)
    }

    fn is_functional(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Node> {
        self.branches.clone()
    }
}

/// Fan-out through a `Split`, fan-in through `join`.
///
/// `join` receives one `Value::List` per branch, in branch order.
pub struct SplitJoin {
    split: Split,
    join: Node,
}

impl SplitJoin {
    pub fn new(split: Split, join: Node) -> Self {
        Self { split, join }
    }
}

impl Operator for SplitJoin {
    fn name(&self) -> &str {
        "SplitJoin"
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        self.split.check_routes("SplitJoin", inputs)
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let parts = self.split.run(inputs)?;
        self.join.process(parts)
    }

    fn is_functional(&self) -> bool {
        false
    }

    fn children(&self) -> Vec<Node> {
        let mut children = self.split.children();
        children.push(self.join.clone());
        children
    }
}
