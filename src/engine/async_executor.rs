//! Thread-pool execution wrapper for fire-and-forget invocations.

use std::num::NonZeroUsize;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use super::Executor;
use crate::error::Error;

/// Runs each submitted line as an independent unit of work on a fixed-size
/// worker pool.
///
/// Failures from the pipeline or the handler are routed to the configured
/// error handler, never back to the submitter; ordering between
/// concurrently submitted lines is not guaranteed. After [`close`] the pool
/// rejects new submissions with [`Error::ExecutorClosed`] while lines
/// already queued still run to completion. Dropping the executor closes it
/// and joins the workers.
///
/// [`close`]: AsyncExecutor::close
pub struct AsyncExecutor {
    sender: Mutex<Option<mpsc::Sender<String>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl AsyncExecutor {
    /// Spawns `workers` threads draining a shared queue into `executor`.
    pub fn new(
        executor: Arc<dyn Executor + Send + Sync>,
        workers: NonZeroUsize,
        on_error: impl Fn(Error) + Send + Sync + 'static,
    ) -> Self {
        let (sender, receiver) = mpsc::channel::<String>();
        let receiver = Arc::new(Mutex::new(receiver));
        let on_error: Arc<dyn Fn(Error) + Send + Sync> = Arc::new(on_error);

        let workers = (0..workers.get())
            .map(|i| {
                let receiver = Arc::clone(&receiver);
                let executor = Arc::clone(&executor);
                let on_error = Arc::clone(&on_error);

                std::thread::Builder::new()
                    .name(format!("commandant-worker-{i}"))
                    .spawn(move || loop {
                        // The lock is released before the line executes, so
                        // workers run invocations concurrently.
                        let line = receiver.lock().recv();
                        match line {
                            Ok(line) => {
                                if let Err(error) = executor.execute(&line) {
                                    on_error(error);
                                }
                            }
                            // All senders gone and the queue is drained.
                            Err(mpsc::RecvError) => break,
                        }
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        }
    }

    /// Stops accepting submissions. Already-queued lines still run; workers
    /// exit once the queue is drained.
    pub fn close(&self) {
        if self.sender.lock().take().is_some() {
            tracing::debug!("async executor closed");
        }
    }

    /// Whether [`close`](AsyncExecutor::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Whether every worker has exited. Only meaningful after closing.
    pub fn is_terminated(&self) -> bool {
        self.workers.lock().iter().all(JoinHandle::is_finished)
    }
}

impl Executor for AsyncExecutor {
    /// Enqueues a line for execution. `Ok` means accepted, not completed.
    fn execute(&self, line: &str) -> Result<(), Error> {
        let sender = self.sender.lock();
        match sender.as_ref() {
            Some(sender) => sender
                .send(line.to_string())
                .map_err(|_| Error::ExecutorClosed),
            None => Err(Error::ExecutorClosed),
        }
    }
}

impl Drop for AsyncExecutor {
    fn drop(&mut self) {
        self.close();
        for worker in self.workers.get_mut().drain(..) {
            let _ = worker.join();
        }
    }
}
