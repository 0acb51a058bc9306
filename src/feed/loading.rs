use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "fetch in progress" flag for one cache.
///
/// Clones observe the same flag, so presentation can keep a handle and read
/// it while the owning cache is busy inside a spawned task.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
  pub fn is_loading(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }

  /// Raise the flag until the returned guard is dropped.
  pub(crate) fn begin(&self) -> LoadingGuard {
    self.0.store(true, Ordering::Release);
    LoadingGuard(self.clone())
  }
}

/// Lowers its flag on drop, including on the error path.
pub(crate) struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
  fn drop(&mut self) {
    (self.0).0.store(false, Ordering::Release);
  }
}

/// Loading flags for every cache behind a coordinator
#[derive(Debug, Clone, Default)]
pub struct LoadingFlags {
  pub feed: LoadingFlag,
  pub employee_feed: LoadingFlag,
  pub directory: LoadingFlag,
}

impl LoadingFlags {
  pub fn any(&self) -> bool {
    self.feed.is_loading() || self.employee_feed.is_loading() || self.directory.is_loading()
  }
}
