//! Identity operators: `Noop` and `Print`.

use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use tabflow_core::config::ExecConfig;
use tabflow_core::error::{Error, Result};
use tabflow_core::hash::hash_serde;
use tabflow_core::types::Value;

use crate::traits::Operator;

/// Returns its inputs unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Noop;

impl Operator for Noop {
    fn name(&self) -> &str {
        "Noop"
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        Ok(inputs)
    }
}

/// Named inspection `Print` can run against a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inspect {
    /// Entire value.
    Full,
    /// First rows of a table (or first items of a list).
    Head,
    Shape,
    Columns,
    Schema,
    /// Short content hash.
    Fingerprint,
}

impl FromStr for Inspect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(Inspect::Full),
            "head" => Ok(Inspect::Head),
            "shape" => Ok(Inspect::Shape),
            "columns" => Ok(Inspect::Columns),
            "schema" => Ok(Inspect::Schema),
            "fingerprint" => Ok(Inspect::Fingerprint),
            other => Err(Error::Config(format!("unknown inspection method '{other}'"))),
        }
    }
}

/// Writes inspections of every input and returns the inputs unchanged.
pub struct Print {
    methods: Vec<Inspect>,
    rows: usize,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Default for Print {
    fn default() -> Self {
        Self::new(vec![Inspect::Full])
    }
}

impl Print {
    pub fn new(methods: Vec<Inspect>) -> Self {
        Self {
            methods: if methods.is_empty() { vec![Inspect::Full] } else { methods },
            rows: ExecConfig::default().print_rows,
            out: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Build from method names such as `["shape", "head"]`.
    pub fn with_methods<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let methods = names
            .iter()
            .map(|n| n.as_ref().parse::<Inspect>())
            .collect::<Result<Vec<Inspect>>>()?;
        Ok(Self::new(methods))
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_writer(mut self, out: Box<dyn Write + Send>) -> Self {
        self.out = Mutex::new(out);
        self
    }

    /// The text `Print` writes for `inputs`.
    pub fn render(&self, inputs: &[Value]) -> String {
        let mut text = String::new();
        for (i, value) in inputs.iter().enumerate() {
            for method in &self.methods {
                text.push_str(&format!("[{i}] {}\n", self.inspect(*method, value)));
            }
        }
        text
    }

    fn inspect(&self, method: Inspect, value: &Value) -> String {
        match (method, value) {
            (Inspect::Full, v) => format!("{v}"),
            (Inspect::Head, Value::Table(t)) => format!("head\n{}", t.render(Some(self.rows))),
            (Inspect::Head, Value::List(items)) => {
                format!("head {}", Value::List(items.iter().take(self.rows).cloned().collect()))
            }
            (Inspect::Head, v) => format!("head {v}"),
            (Inspect::Shape, v) => format!("shape {}", v.summary()),
            (Inspect::Columns, Value::Table(t)) => format!("columns {}", t.column_names().join(", ")),
            (Inspect::Columns, v) => format!("columns - ({})", v.summary()),
            (Inspect::Schema, Value::Table(t)) => format!("schema {}", t.schema()),
            (Inspect::Schema, v) => format!("schema - ({})", v.summary()),
            (Inspect::Fingerprint, v) => match hash_serde(v) {
                Ok(h) => format!("fingerprint {}", h.short()),
                Err(e) => format!("fingerprint unavailable: {e}"),
            },
        }
    }
}

impl Operator for Print {
    fn name(&self) -> &str {
        "Print"
    }

    fn run(&self, inputs: Vec<Value>) -> Result<Vec<Value>> {
        let text = self.render(&inputs);
        if let Ok(mut out) = self.out.lock() {
            if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
                tracing::warn!(error = %e, "print output failed");
            }
        }
        Ok(inputs)
    }
}
