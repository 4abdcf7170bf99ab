//! Order-preserving fan-out of independent tasks.
//!
//! `fan_out` is the one entry point composites use. Above the threshold each
//! task is submitted to the shared pool; at or below it the tasks simply run
//! in order on the calling thread. Either way the caller gets one result per
//! task, in task order, after every task has finished.

use std::time::Instant;

use tabflow_core::error::Result;

use crate::metrics;
use crate::pool;

/// A unit of work handed to `fan_out`.
pub type Task<T> = Box<dyn FnOnce() -> Result<T> + Send + 'static>;

/// Run `tasks`, in parallel when `workers > threshold`.
///
/// Errors are reported after all tasks complete; the first failing task in
/// declaration order wins. Calls made from inside a pool worker always run
/// sequentially so nested composites cannot starve the pool.
pub fn fan_out<T: Send + 'static>(tasks: Vec<Task<T>>, workers: usize, threshold: usize) -> Result<Vec<T>> {
    if workers <= threshold || tasks.len() <= 1 || pool::in_worker() {
        return tasks.into_iter().map(|task| task()).collect();
    }

    let started = Instant::now();
    let count = tasks.len();
    let pool = pool::ensure_pool(workers)?;

    let handles = tasks
        .into_iter()
        .map(|task| pool.submit(task))
        .collect::<Result<Vec<_>>>()?;

    let results: Vec<Result<T>> = handles.into_iter().map(|h| h.wait()).collect();
    metrics::record_fan_out(count, pool.workers(), started.elapsed());

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tabflow_core::error::Error;

    fn delayed(value: usize, delay_ms: u64) -> Task<usize> {
        Box::new(move || {
            std::thread::sleep(Duration::from_millis(delay_ms));
            Ok(value)
        })
    }

    #[test]
    fn sequential_below_threshold() {
        let tasks: Vec<Task<bool>> = vec![Box::new(|| Ok(pool::in_worker())), Box::new(|| Ok(pool::in_worker()))];
        let out = fan_out(tasks, 1, 1).unwrap();
        assert_eq!(out, vec![false, false]);
    }

    #[test]
    fn results_keep_declaration_order() {
        // Later tasks finish first.
        let tasks = vec![delayed(0, 60), delayed(1, 30), delayed(2, 0)];
        let out = fan_out(tasks, 3, 1).unwrap();
        assert_eq!(out, vec![0, 1, 2]);
    }

    #[test]
    fn first_error_in_declaration_order_wins() {
        let tasks: Vec<Task<usize>> = vec![
            delayed(0, 0),
            Box::new(|| {
                std::thread::sleep(Duration::from_millis(30));
                Err(Error::exec("slow", "first failure"))
            }),
            Box::new(|| Err(Error::exec("fast", "second failure"))),
        ];
        match fan_out(tasks, 3, 1) {
            Err(Error::Exec { operator, .. }) => assert_eq!(operator, "slow"),
            other => panic!("expected exec error, got {other:?}"),
        }
    }
}
