//! Operator trait + the `Node` handle pipelines are built from.
//!
//! Every unit of work, leaf or composite, implements `Operator`. Pipelines
//! never hold operators directly: they hold `Node`s, cheap shared handles that
//! also carry the observers attached at that position in the tree. Callers
//! always go through `Node::process`, which runs the validation hook, the
//! processing function, and then notifies observers.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use tabflow_core::error::Result;
use tabflow_core::types::Value;

use crate::observer::Observer;

/// Shared list of observers attached to one node.
pub type Observers = Vec<Arc<dyn Observer>>;

/// Trait that all operators must implement.
///
/// Invariants:
/// - `run` receives exactly the values its caller passed; any output tuple of
///   one operator is an acceptable input tuple of another (only arity matters).
/// - Operators hold no per-call state about the values they saw unless they
///   are explicitly stateful (e.g. a reduce accumulator built by `Scoped`).
pub trait Operator: Send + Sync + 'static {
    /// Human-readable operator name (stable).
    fn name(&self) -> &str;

    /// Reject malformed inputs before any processing happens.
    fn validate(&self, _inputs: &[Value]) -> Result<()> {
        Ok(())
    }

    /// The processing function.
    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>>;

    /// Functional operators are observed; pure control-flow containers are not.
    fn is_functional(&self) -> bool {
        true
    }

    /// Direct children, in declaration order.
    fn children(&self) -> Vec<Node> {
        Vec::new()
    }

    /// Called when observers are attached to this operator's node.
    ///
    /// The default hands them to every child that has none yet; an already
    /// configured child keeps its own.
    fn attach_observers(&self, observers: &Observers) {
        for child in self.children() {
            if !child.has_observers() {
                child.set_observers(observers.clone());
            }
        }
    }
}

struct NodeInner {
    op: Box<dyn Operator>,
    observers: OnceCell<Observers>,
}

/// Shared handle to an operator placed in a pipeline tree.
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    pub fn new<O: Operator>(op: O) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                op: Box::new(op),
                observers: OnceCell::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.op.name()
    }

    pub fn operator(&self) -> &dyn Operator {
        self.inner.op.as_ref()
    }

    pub fn is_functional(&self) -> bool {
        self.inner.op.is_functional()
    }

    pub fn children(&self) -> Vec<Node> {
        self.inner.op.children()
    }

    pub fn observers(&self) -> &[Arc<dyn Observer>] {
        self.inner.observers.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_observers(&self) -> bool {
        self.inner.observers.get().is_some()
    }

    /// Attach observers. The first assignment wins: returns `false` and
    /// changes nothing if this node already has observers.
    pub fn set_observers(&self, observers: Observers) -> bool {
        if self.inner.observers.set(observers).is_err() {
            return false;
        }
        if let Some(observers) = self.inner.observers.get() {
            self.inner.op.attach_observers(observers);
        }
        true
    }

    pub fn with_observers(self, observers: Observers) -> Self {
        self.set_observers(observers);
        self
    }

    /// Validate, run, notify observers, and return the outputs untouched.
    pub fn process(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let op = self.inner.op.as_ref();
        op.validate(&inputs)?;
        let outputs = op.run(inputs)?;
        for observer in self.observers() {
            observer.observe(op, &outputs);
        }
        Ok(outputs)
    }

    /// True when both handles point at the same operator instance.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<O: Operator> From<O> for Node {
    fn from(op: O) -> Self {
        Node::new(op)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("functional", &self.is_functional())
            .field("observers", &self.observers().len())
            .finish()
    }
}

/// Take the single output a child must produce, or fail with `Error::Arity`.
pub(crate) fn single_output(parent: &str, outputs: Vec<Value>) -> Result<Value> {
    if outputs.len() != 1 {
        return Err(tabflow_core::Error::Arity {
            operator: parent.to_string(),
            expected: 1,
            got: outputs.len(),
        });
    }
    let mut outputs = outputs;
    Ok(outputs.remove(0))
}
