//! Scoped: build a fresh child operator on every call.
//!
//! The factory runs once per `process` call, so state captured by the child
//! (an accumulator, a counter) never leaks between calls. The factory itself
//! should not keep mutable state beyond what it explicitly captures.

use once_cell::sync::OnceCell;

use tabflow_core::error::Result;
use tabflow_core::types::Value;

use crate::traits::{Node, Observers, Operator};

type Factory = Box<dyn Fn() -> Result<Node> + Send + Sync>;

pub struct Scoped {
    name: String,
    factory: Factory,
    observers: OnceCell<Observers>,
}

impl Scoped {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Node> + Send + Sync + 'static,
    {
        Self::named("Scoped", factory)
    }

    pub fn named<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Node> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Box::new(factory),
            observers: OnceCell::new(),
        }
    }
}

impl Operator for Scoped {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let child = (self.factory)()?;
        if let Some(observers) = self.observers.get() {
            if !child.has_observers() {
                child.set_observers(observers.clone());
            }
        }
        tracing::trace!(scope = %self.name, child = child.name(), "built scoped operator");
        child.process(inputs)
    }

    fn is_functional(&self) -> bool {
        false
    }

    fn attach_observers(&self, observers: &Observers) {
        // Children don't exist yet; remember the observers for each build.
        let _ = self.observers.set(observers.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::FnOperator;
    use crate::observer::RecordingObserver;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tabflow_core::types::Scalar;

    /// Leaf counting how many times *this instance* has run.
    fn counter() -> Node {
        let runs = AtomicI64::new(0);
        Node::new(FnOperator::new("counter", move |_| {
            let n = runs.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(vec![Value::Scalar(Scalar::I64(n))])
        }))
    }

    #[test]
    fn every_call_gets_a_fresh_child() {
        let builds = Arc::new(AtomicUsize::new(0));
        let b = builds.clone();
        let scoped = Node::new(Scoped::new(move || {
            b.fetch_add(1, Ordering::SeqCst);
            Ok(counter())
        }));

        for _ in 0..3 {
            assert_eq!(scoped.process(vec![]).unwrap(), vec![Value::Scalar(Scalar::I64(1))]);
        }
        assert_eq!(builds.load(Ordering::SeqCst), 3);

        // A shared instance, by contrast, keeps counting.
        let shared = counter();
        shared.process(vec![]).unwrap();
        assert_eq!(shared.process(vec![]).unwrap(), vec![Value::Scalar(Scalar::I64(2))]);
    }

    #[test]
    fn observers_reach_the_built_child_not_the_scope() {
        let rec = Arc::new(RecordingObserver::new());
        let scoped = Node::new(Scoped::named("per-call", || Ok(counter())));
        scoped.set_observers(vec![rec.clone()]);

        scoped.process(vec![]).unwrap();
        scoped.process(vec![]).unwrap();
        assert_eq!(rec.operators(), vec!["counter".to_string(), "counter".to_string()]);
    }

    #[test]
    fn factory_errors_propagate() {
        let scoped = Node::new(Scoped::new(|| {
            Err(tabflow_core::Error::Config("cannot build".into()))
        }));
        assert!(matches!(scoped.process(vec![]), Err(tabflow_core::Error::Config(_))));
    }
}
