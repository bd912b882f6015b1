//! Fixed-size worker pool with typed results.
//!
//! N persistent tokio tasks pull work from a bounded `async-channel` queue
//! and push one result per item onto an unbounded channel. At most N items
//! are ever being processed at once; the queue capacity of N keeps the
//! submitter from running ahead of the workers.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A pool of worker tasks processing items concurrently.
///
/// ```ignore
/// let mut pool = WorkerPool::start(4, entries, |entry| async move {
///     process(entry).await
/// });
/// while let Some(outcome) = pool.recv().await {
///     record(outcome);
/// }
/// ```
pub struct WorkerPool<R: Send + 'static> {
    result_rx: mpsc::UnboundedReceiver<R>,
    handles: Vec<JoinHandle<()>>,
    workers: usize,
}

impl<R: Send + 'static> WorkerPool<R> {
    /// Spawn `n` workers (at least one) and queue every item.
    ///
    /// Items are fed from a background task so the caller can start
    /// receiving results right away.
    pub fn start<W, F, Fut>(n: usize, items: Vec<W>, process_fn: F) -> Self
    where
        W: Send + 'static,
        F: Fn(W) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let workers = n.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<W>(workers);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<R>();
        let process_fn = Arc::new(process_fn);

        let handles = (0..workers)
            .map(|worker| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    let mut processed = 0usize;
                    while let Ok(item) = work_rx.recv().await {
                        let result = process_fn(item).await;
                        processed += 1;
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                    log::trace!("worker {} exiting after {} items", worker, processed);
                })
            })
            .collect();

        // The result channel closes once every worker has dropped its sender.
        drop(result_tx);

        tokio::spawn(async move {
            for item in items {
                if work_tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        Self {
            result_rx,
            handles,
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Next finished result, or `None` once every item has been processed.
    pub async fn recv(&mut self) -> Option<R> {
        self.result_rx.recv().await
    }

    /// Drain every remaining result and wait for the workers to exit.
    pub async fn join(mut self) -> Vec<R> {
        let mut results = Vec::new();
        while let Some(r) = self.result_rx.recv().await {
            results.push(r);
        }
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                log::warn!("worker task panicked: {}", e);
            }
        }
        results
    }
}

#[cfg(test)]
#[path = "tests/worker_pool_tests.rs"]
mod tests;
