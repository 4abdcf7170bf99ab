#![forbid(unsafe_code)]
//! tabflow-exec: the worker pool behind parallel Compose/Split.
//!
//! Everything here is synchronous: callers hand over boxed tasks and block
//! until every task has finished. Results always come back in the order the
//! tasks were given, whatever order the workers complete them in.

pub mod metrics;
pub mod parallel;
pub mod pool;

pub use parallel::{fan_out, Task};
pub use pool::{ensure_pool, shutdown_pool, TaskHandle, WorkerPool};
