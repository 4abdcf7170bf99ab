#![forbid(unsafe_code)]
//! tabflow-io: getting tables in and out of pipelines.
//!
//! Survey-specific readers and cleaners are not part of this crate; it only
//! provides the generic CSV/JSON plumbing the CLI and snapshot observers need.

pub mod error;
pub mod readers;
pub mod snapshot;
pub mod writers;

pub use error::{Error, Result};
pub use readers::csv::{read_csv_path, CsvReader};
pub use snapshot::CsvSnapshotObserver;
pub use writers::csv::CsvWriter;
pub use writers::json::value_to_json;
