#![forbid(unsafe_code)]
//! tabflow-operators: the operator contract, the observer side channel, and
//! the composites pipelines are assembled from.
//!
//! Composites encode one fixed data-flow pattern each:
//! - `Sequence`: chain outputs into the next step
//! - `Compose`: same inputs to every branch, collect all outputs
//! - `Split` / `SplitJoin`: route inputs to branches (and join them back)
//! - `Map` / `MapIterable` / `Iterate`: apply one child across values
//! - `Reduce` / `ReduceProcessing`: left folds
//! - `ProcessDataframe`: transform selected positions only
//! - `Scoped`: rebuild a child on every call
//!
//! Concrete transforms are external; wrap them with `FnOperator` or implement
//! `Operator` directly.

pub mod basic;
pub mod compose;
pub mod func;
pub mod iterate;
pub mod map;
pub mod observer;
pub mod process_dataframe;
pub mod reduce;
pub mod scoped;
pub mod sequence;
pub mod split;
pub mod traits;

pub use basic::{Inspect, Noop, Print};
pub use compose::Compose;
pub use func::FnOperator;
pub use iterate::Iterate;
pub use map::{Map, MapIterable};
pub use observer::{Observation, Observer, RecordingObserver, TracingObserver};
pub use process_dataframe::ProcessDataframe;
pub use reduce::{Reduce, ReduceProcessing, Reducer};
pub use scoped::Scoped;
pub use sequence::Sequence;
pub use split::{Split, SplitJoin};
pub use traits::{Node, Observers, Operator};
