//! Process-wide worker pool.
//!
//! The pool is created lazily on first parallel dispatch and rebuilt whenever
//! a caller asks for a different worker count. Reconfiguration is global: a
//! composite asking for 4 workers replaces a pool another composite sized to 2.
//! Callers that already hold an `Arc<WorkerPool>` keep using the old pool until
//! they drop it.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

use tabflow_core::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

static POOL: Lazy<Mutex<Option<Arc<WorkerPool>>>> = Lazy::new(|| Mutex::new(None));

thread_local! {
    static IN_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// Fixed-size set of worker threads fed from one shared job queue.
pub struct WorkerPool {
    workers: usize,
    tx: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let (tx, rx) = unbounded::<Job>();

        let mut handles = Vec::with_capacity(workers);
        for i in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("tabflow-worker-{i}"))
                .spawn(move || {
                    IN_WORKER.with(|w| w.set(true));
                    while let Ok(job) = rx.recv() {
                        job();
                    }
                })
                .map_err(|e| Error::Worker(format!("spawn worker {i}: {e}")))?;
            handles.push(handle);
        }

        Ok(Self {
            workers,
            tx: Some(tx),
            handles,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Queue `f` on the pool and return a handle to its eventual result.
    ///
    /// A panic inside `f` is caught on the worker and surfaces as
    /// `Error::Worker` when the handle is waited on.
    pub fn submit<T, F>(&self, f: F) -> Result<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (result_tx, result_rx) = bounded(1);
        let job: Job = Box::new(move || {
            let out = panic::catch_unwind(AssertUnwindSafe(f))
                .unwrap_or_else(|payload| Err(Error::Worker(panic_message(payload.as_ref()))));
            // The receiver may be gone if the caller bailed out early.
            let _ = result_tx.send(out);
        });

        self.tx
            .as_ref()
            .ok_or_else(|| Error::Worker("worker pool is shut down".into()))?
            .send(job)
            .map_err(|_| Error::Worker("worker pool queue disconnected".into()))?;

        Ok(TaskHandle { rx: result_rx })
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue lets every worker drain outstanding jobs and exit.
        drop(self.tx.take());
        for h in self.handles.drain(..) {
            let _ = h.join();
        }
    }
}

/// Opaque handle to a task running on the pool.
pub struct TaskHandle<T> {
    rx: Receiver<Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task finishes.
    pub fn wait(self) -> Result<T> {
        self.rx
            .recv()
            .map_err(|_| Error::Worker("worker dropped the task without a result".into()))?
    }
}

/// Return the shared pool, (re)building it if it is missing or sized differently.
pub fn ensure_pool(workers: usize) -> Result<Arc<WorkerPool>> {
    let workers = workers.max(1);
    let mut slot = POOL
        .lock()
        .map_err(|_| Error::Worker("worker pool lock poisoned".into()))?;

    match slot.as_ref() {
        Some(pool) if pool.workers() == workers => return Ok(Arc::clone(pool)),
        Some(pool) => {
            tracing::warn!(old = pool.workers(), new = workers, "rebuilding worker pool")
        }
        None => tracing::debug!(workers, "starting worker pool"),
    }

    let pool = Arc::new(WorkerPool::new(workers)?);
    *slot = Some(Arc::clone(&pool));
    Ok(pool)
}

/// Drop the shared pool. The next parallel dispatch starts a fresh one.
pub fn shutdown_pool() {
    if let Ok(mut slot) = POOL.lock() {
        if slot.take().is_some() {
            tracing::debug!("worker pool shut down");
        }
    }
}

/// Worker count of the shared pool, if one is running.
pub fn current_pool_size() -> Option<usize> {
    POOL.lock().ok()?.as_ref().map(|p| p.workers())
}

/// True when called from one of the pool's worker threads.
pub fn in_worker() -> bool {
    IN_WORKER.with(|w| w.get())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {s}")
    } else {
        "worker panicked".to_string()
    }
}
