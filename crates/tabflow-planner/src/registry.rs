//! Leaf operator registry keyed by name.
//!
//! The planner only knows the composites; everything that touches table
//! contents comes from factories registered here. Each factory receives the
//! leaf's `config` block from the pipeline document.

use std::collections::BTreeMap;
use std::sync::Arc;

use tabflow_operators::{Node, Noop, Print};

use crate::error::PlanError;

pub type LeafFactory = Arc<dyn Fn(&serde_json::Value) -> Result<Node, PlanError> + Send + Sync>;

#[derive(Clone)]
pub struct Registry {
    factories: BTreeMap<String, LeafFactory>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with the built-in `noop` and `print` leaves.
    pub fn new() -> Self {
        let mut reg = Self::empty();
        reg.register("noop", |_| Ok(Node::new(Noop)));
        reg.register("print", |config| {
            let methods: Vec<String> = match config.get("methods") {
                Some(m) => serde_json::from_value(m.clone())
                    .map_err(|e| PlanError::Config(format!("print methods: {e}")))?,
                None => Vec::new(),
            };
            Ok(Node::new(Print::with_methods(&methods)?))
        });
        reg
    }

    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register (or replace) the factory for `key`.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&serde_json::Value) -> Result<Node, PlanError> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Arc::new(factory));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiate the leaf registered under `key`.
    pub fn make(&self, key: &str, config: &serde_json::Value) -> Result<Node, PlanError> {
        let factory = self
            .factories
            .get(key)
            .ok_or_else(|| PlanError::Config(format!("unknown operator key '{key}'")))?;
        factory(config)
    }
}
