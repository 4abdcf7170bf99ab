//! Leaf operators backed by plain closures.
//!
//! Concrete transforms (renames, filters, resampling, ...) live outside this
//! crate; `FnOperator` is the simplest way to plug one in.

use tabflow_core::error::Result;
use tabflow_core::types::Value;

use crate::traits::Operator;

type ProcessFn = Box<dyn Fn(Vec<Value>) -> Result<Vec<Value>> + Send + Sync>;
type ValidateFn = Box<dyn Fn(&[Value]) -> Result<()> + Send + Sync>;

pub struct FnOperator {
    name: String,
    process: ProcessFn,
    validator: Option<ValidateFn>,
    functional: bool,
}

impl FnOperator {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            process: Box::new(f),
            validator: None,
            functional: true,
        }
    }

    /// Leaf that returns its inputs unchanged.
    pub fn identity(name: impl Into<String>) -> Self {
        Self::new(name, Ok)
    }

    /// Operator applying `f` to every input independently (one output per input).
    pub fn each<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, move |inputs| inputs.into_iter().map(&f).collect())
    }

    pub fn with_validator<V>(mut self, v: V) -> Self
    where
        V: Fn(&[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(v));
        self
    }

    /// Mark as pure control flow so observers skip it.
    pub fn infrastructure(mut self) -> Self {
        self.functional = false;
        self
    }
}

impl Operator for FnOperator {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, inputs: &[Value]) -> Result<()> {
        match &self.validator {
            Some(v) => v(inputs),
            None => Ok(()),
        }
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        (self.process)(inputs)
    }

    fn is_functional(&self) -> bool {
        self.functional
    }
}
