//! Backend context providers.
//!
//! The harness only consumes a per-API "context can be created" signal and
//! opaque handles. This build ships the host backend: a scratch worker
//! thread fed through a channel, standing in for an accelerator submission
//! queue. Vendor backends plug in through the same seam in dedicated
//! builds.

use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::api::Api;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend {0} is not available in this build")]
    NotAvailable(Api),
    #[error("device is not capable: {0}")]
    NotCapable(String),
    #[error("worker queue is closed")]
    QueueClosed,
}

/// Whether a device context for the given API can be created in this build.
pub fn context_available(api: Api) -> bool {
    matches!(api, Api::Host)
}

type Job = Box<dyn FnOnce() + Send>;

/// Host execution context: one worker thread consuming submitted jobs in
/// order. Submission and completion semantics mirror an in-order device
/// queue with an explicit synchronize boundary.
pub struct HostContext {
    sender: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl HostContext {
    pub fn new() -> Result<Self, BackendError> {
        let (sender, receiver): (Sender<Job>, Receiver<Job>) = bounded(64);
        let worker = std::thread::Builder::new()
            .name("host-queue".to_string())
            .spawn(move || {
                while let Ok(job) = receiver.recv() {
                    job();
                }
            })
            .map_err(|e| BackendError::NotCapable(format!("worker thread: {e}")))?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Enqueue a job without waiting for it.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<(), BackendError> {
        self.sender
            .as_ref()
            .ok_or(BackendError::QueueClosed)?
            .send(Box::new(job))
            .map_err(|_| BackendError::QueueClosed)
    }

    /// Enqueue a job and block until the worker has executed it. This is
    /// the synchronize boundary measured samples must sit behind.
    pub fn submit_and_wait(
        &self,
        job: impl FnOnce() + Send + 'static,
    ) -> Result<(), BackendError> {
        let (done_tx, done_rx) = bounded::<()>(1);
        self.submit(move || {
            job();
            let _ = done_tx.send(());
        })?;
        done_rx.recv().map_err(|_| BackendError::QueueClosed)
    }
}

impl Drop for HostContext {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("host queue worker exited with a panic");
            }
        }
    }
}
