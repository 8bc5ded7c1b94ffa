use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// WorkerPool - a fixed number of tasks draining one shared job queue
///
/// The queue is closed once every job is enqueued. Workers exit when it is
/// closed and empty, and the results channel closes only after the last
/// worker has exited, while a collector task drains results as they come.
/// Results are returned in completion order. A handler that panics does not
/// cost its job a result: `recover` builds one from a copy of the job and the
/// panic message.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// A pool of `workers` tasks; zero is treated as one.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn run<J, R, F, Fut, P>(&self, jobs: Vec<J>, handler: F, recover: P) -> Vec<R>
    where
        J: Clone + Send + 'static,
        R: Send + 'static,
        F: Fn(J) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        P: Fn(J, String) -> R + Send + Sync + 'static,
    {
        let job_count = jobs.len();
        let handler = Arc::new(handler);
        let recover = Arc::new(recover);
        let (job_tx, job_rx) = mpsc::channel::<J>(self.workers);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<R>(self.workers);

        let collector = tokio::spawn(async move {
            let mut results = Vec::with_capacity(job_count);
            while let Some(result) = result_rx.recv().await {
                results.push(result);
            }
            results
        });

        // dropping the sender at the end closes the queue
        let producer = tokio::spawn(async move {
            for job in jobs {
                if job_tx.send(job).await.is_err() {
                    break;
                }
            }
        });

        let workers: Vec<_> = (0..self.workers)
            .map(|worker_id| {
                let job_rx = Arc::clone(&job_rx);
                let result_tx = result_tx.clone();
                let handler = Arc::clone(&handler);
                let recover = Arc::clone(&recover);
                tokio::spawn(async move {
                    let mut handled = 0usize;
                    loop {
                        let job = job_rx.lock().await.recv().await;
                        let Some(job) = job else { break };
                        let spare = job.clone();
                        let result = match AssertUnwindSafe(async { handler(job).await })
                            .catch_unwind()
                            .await
                        {
                            Ok(result) => result,
                            Err(panic) => {
                                let message = panic_message(&*panic);
                                tracing::error!(worker_id, "Job handler panicked: {}", message);
                                recover(spare, message)
                            }
                        };
                        handled += 1;
                        if result_tx.send(result).await.is_err() {
                            break;
                        }
                    }
                    tracing::trace!(worker_id, handled, "Worker finished");
                })
            })
            .collect();
        drop(result_tx);

        for outcome in join_all(workers).await {
            if let Err(e) = outcome {
                tracing::error!("Worker task failed: {}", e);
            }
        }
        if let Err(e) = producer.await {
            tracing::error!("Job producer failed: {}", e);
        }

        match collector.await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("Result collector failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
