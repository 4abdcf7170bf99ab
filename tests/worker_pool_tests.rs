//! Shared worker pool lifecycle. Kept in its own test binary because the pool
//! is process-global and other tests resize it concurrently.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tabflow_core::types::{Scalar, Value};
use tabflow_exec::pool::current_pool_size;
use tabflow_exec::{ensure_pool, fan_out, shutdown_pool, Task};
use tabflow_operators::{Compose, FnOperator, Node};

#[test]
fn pool_lifecycle_and_nested_parallel_composites() {
    shutdown_pool();
    assert_eq!(current_pool_size(), None);

    // Same size is reused, a different size rebuilds.
    let a = ensure_pool(2).unwrap();
    let b = ensure_pool(2).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    let c = ensure_pool(3).unwrap();
    assert_eq!(c.workers(), 3);
    assert_eq!(current_pool_size(), Some(3));
    drop((a, b, c));

    // Results come back in task order even when later tasks finish first.
    let tasks: Vec<Task<usize>> = (0..6usize)
        .map(|i| -> Task<usize> {
            Box::new(move || {
                std::thread::sleep(Duration::from_millis(((6 - i) * 5) as u64));
                Ok(i)
            })
        })
        .collect();
    assert_eq!(fan_out(tasks, 4, 1).unwrap(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(current_pool_size(), Some(4));

    // Every task still runs when an early one fails.
    let ran = Arc::new(AtomicUsize::new(0));
    let tasks: Vec<Task<()>> = (0..4usize)
        .map(|i| -> Task<()> {
            let ran = ran.clone();
            Box::new(move || {
                ran.fetch_add(1, Ordering::SeqCst);
                if i == 1 {
                    Err(tabflow_core::Error::exec("task", "first"))
                } else if i == 3 {
                    Err(tabflow_core::Error::exec("task", "second"))
                } else {
                    Ok(())
                }
            })
        })
        .collect();
    match fan_out(tasks, 4, 1) {
        Err(tabflow_core::Error::Exec { message, .. }) => assert_eq!(message, "first"),
        other => panic!("expected exec error, got {other:?}"),
    }
    assert_eq!(ran.load(Ordering::SeqCst), 4);

    // A parallel Compose nested inside another one does not deadlock.
    let leaf = || Node::new(FnOperator::identity("leaf"));
    let inner = || Node::new(Compose::new(vec![leaf(), leaf()]).unwrap().with_workers(2));
    let outer = Node::new(Compose::new(vec![inner(), inner()]).unwrap().with_workers(2));
    let x = Value::Scalar(Scalar::I64(1));
    let out = outer.process(vec![x.clone()]).unwrap();
    let expected_inner = Value::List(vec![Value::List(vec![x.clone()]), Value::List(vec![x])]);
    assert_eq!(out, vec![expected_inner.clone(), expected_inner]);

    shutdown_pool();
    assert_eq!(current_pool_size(), None);
}
