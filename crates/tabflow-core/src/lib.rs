#![forbid(unsafe_code)]
//! tabflow-core: values, tables, configuration, and the error taxonomy shared
//! by every tabflow crate.
//!
//! The core never interprets table contents on behalf of operators; it only
//! defines what travels between them.

pub mod config;
pub mod error;
pub mod hash;
pub mod prelude;
pub mod schema;
pub mod types;

pub use config::ExecConfig;
pub use error::{Error, Result};
pub use types::{Column, Scalar, Table, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
