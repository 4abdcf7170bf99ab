//! Convenient re-exports for downstream crates.

pub use crate::config::ExecConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::{hash_serde, Hash256};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Column, Scalar, Table, Value};
