//! tabflow: composable table-transformation pipelines.
//!
//! Facade over the workspace crates so applications can depend on one crate.

pub use tabflow_core as core;
pub use tabflow_exec as exec;
pub use tabflow_io as io;
pub use tabflow_operators as operators;
pub use tabflow_planner as planner;

pub use tabflow_core::{Error, ExecConfig, Result, Table, Value};
pub use tabflow_operators::{Node, Observer, Operator};
