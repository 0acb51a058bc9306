//! Background operations polled from the UI tick.
//!
//! An [`Operation<T>`] runs a future on the tokio runtime and hands its output
//! back through a channel, so the event loop never blocks on a fetch.
//!
//! ```ignore
//! let mut op = Operation::spawn(async move {
//!     let result = coordinator.select_all().await;
//!     (coordinator, result)
//! });
//!
//! // In event loop tick
//! if let OperationStatus::Ready((coordinator, result)) = op.poll() {
//!     // take the coordinator back, render the result
//! }
//! ```

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// What a poll observed
#[derive(Debug)]
pub enum OperationStatus<T> {
  /// Nothing was started, or the result was already taken
  Idle,
  /// Still running
  Pending,
  /// Finished; the output is handed over exactly once
  Ready(T),
  /// The task ended without producing output (it panicked)
  Lost,
}

pub struct Operation<T> {
  receiver: Option<mpsc::UnboundedReceiver<T>>,
  started_at: Option<Instant>,
}

impl<T: Send + 'static> Operation<T> {
  pub fn idle() -> Self {
    Self {
      receiver: None,
      started_at: None,
    }
  }

  /// Start running `future` in the background.
  pub fn spawn<Fut>(future: Fut) -> Self
  where
    Fut: Future<Output = T> + Send + 'static,
  {
    let future: BoxFuture<'static, T> = future.boxed();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
      let output = future.await;
      // Ignore send errors - the operation may have been dropped
      let _ = tx.send(output);
    });

    Self {
      receiver: Some(rx),
      started_at: Some(Instant::now()),
    }
  }

  pub fn is_in_flight(&self) -> bool {
    self.receiver.is_some()
  }

  /// How long the current operation has been running
  pub fn elapsed(&self) -> Option<Duration> {
    self.started_at.map(|t| t.elapsed())
  }

  /// Check for a result without blocking.
  pub fn poll(&mut self) -> OperationStatus<T> {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return OperationStatus::Idle,
    };

    let status = match receiver.try_recv() {
      Ok(output) => OperationStatus::Ready(output),
      Err(mpsc::error::TryRecvError::Empty) => return OperationStatus::Pending,
      Err(mpsc::error::TryRecvError::Disconnected) => OperationStatus::Lost,
    };

    self.receiver = None;
    self.started_at = None;
    status
  }
}

impl<T: Send + 'static> Default for Operation<T> {
  fn default() -> Self {
    Self::idle()
  }
}

impl<T> std::fmt::Debug for Operation<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Operation")
      .field("in_flight", &self.receiver.is_some())
      .field("started_at", &self.started_at)
      .finish()
  }
}
