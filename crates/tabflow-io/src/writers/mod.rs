//! Writers for tables and pipeline outputs.

pub mod csv;
pub mod json;
