//! Callback delivery for send outcomes.
//!
//! The async API ([`Sender::send`]) is enough for Rust callers. Platform
//! bridges that expect a completion callback on a particular thread use a
//! [`Dispatcher`] instead: the send runs on a tokio runtime and the callback
//! is handed to a [`CompletionExecutor`], which decides where it runs.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};

use crate::{PutRequest, Result, Sender};

/// A boxed, run-once completion callback.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Schedules completion callbacks.
pub trait CompletionExecutor: Send + Sync {
    fn execute(&self, completion: Completion);
}

/// Runs completions immediately on the runtime task that produced the outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl CompletionExecutor for InlineExecutor {
    fn execute(&self, completion: Completion) {
        completion();
    }
}

/// Posts completions to a [`CompletionQueue`] drained by its owner.
#[derive(Clone)]
pub struct QueueExecutor {
    tx: mpsc::UnboundedSender<Completion>,
}

impl QueueExecutor {
    /// Creates an executor and the queue its completions are posted to.
    pub fn channel() -> (Self, CompletionQueue) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, CompletionQueue { rx })
    }
}

impl fmt::Debug for QueueExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueExecutor")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl CompletionExecutor for QueueExecutor {
    fn execute(&self, completion: Completion) {
        // A dropped queue means nobody is waiting for the outcome.
        if self.tx.send(completion).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!("completion queue closed, discarding outcome");
        }
    }
}

/// Receiving side of a [`QueueExecutor`].
pub struct CompletionQueue {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl CompletionQueue {
    /// Runs every completion queued so far without waiting. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(completion) = self.rx.try_recv() {
            completion();
            ran += 1;
        }
        ran
    }

    /// Waits for the next completion and runs it.
    ///
    /// Returns `false` once every executor has been dropped and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(completion) => {
                completion();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for CompletionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionQueue").finish_non_exhaustive()
    }
}

/// Spawns sends on a runtime and delivers each outcome through an executor.
#[derive(Clone)]
pub struct Dispatcher {
    sender: Sender,
    runtime: Handle,
    executor: Arc<dyn CompletionExecutor>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Creates a dispatcher that runs completions inline.
    pub fn new(sender: Sender, runtime: Handle) -> Self {
        Self {
            sender,
            runtime,
            executor: Arc::new(InlineExecutor),
        }
    }

    /// Replaces the completion executor.
    pub fn with_executor(mut self, executor: impl CompletionExecutor + 'static) -> Self {
        self.executor = Arc::new(executor);
        self
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// Sends a prepared request in the background.
    ///
    /// `on_complete` is invoked exactly once, through the executor, unless
    /// the runtime shuts down before the send finishes.
    pub fn dispatch<T, F>(
        &self,
        request: PutRequest,
        success_value: T,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        T: Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        let sender = self.sender.clone();
        let executor = Arc::clone(&self.executor);
        self.runtime.spawn(async move {
            let outcome = sender.execute(&request, success_value).await;
            executor.execute(Box::new(move || on_complete(outcome)));
        })
    }

    /// Builds and dispatches a request.
    ///
    /// Serialization and URL errors are delivered through the executor like
    /// any other outcome, without a network attempt.
    pub fn send<B, T, F>(
        &self,
        url: &str,
        payload: &B,
        success_value: T,
        on_complete: F,
    ) -> JoinHandle<()>
    where
        B: Serialize + fmt::Debug + ?Sized,
        T: Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        match self.sender.request(url, payload) {
            Ok(request) => self.dispatch(request, success_value, on_complete),
            Err(err) => {
                let executor = Arc::clone(&self.executor);
                self.runtime.spawn(async move {
                    executor.execute(Box::new(move || on_complete(Err(err))));
                })
            }
        }
    }
}
