#![forbid(unsafe_code)]
//! tabflow-planner: YAML pipeline documents → operator trees.
//!
//! - `dsl::yaml` parses a document into a `NodeSpec` tree plus optional
//!   execution overrides.
//! - `registry` maps leaf keys to factories; concrete transforms register
//!   themselves here.
//! - `build` turns specs into `Node`s, failing before any data flows when a
//!   key is unknown or the structure is inconsistent.
//! - `explain` renders a built tree.

pub mod build;
pub mod dsl;
pub mod error;
pub mod explain;
pub mod registry;

pub use build::build;
pub use dsl::yaml::{parse_yaml_pipeline, NodeSpec, ParsedPipeline, PipelineConfig};
pub use error::PlanError;
pub use explain::explain;
pub use registry::{LeafFactory, Registry};
