//! Accumulating cache over the cursor-paginated transaction feed.

use std::sync::Arc;
use tracing::{debug, warn};

use super::error::FetchError;
use super::loading::LoadingFlag;
use super::traits::PageFetcher;
use super::types::{Cursor, Transaction};

/// Everything the feed has delivered since the last invalidation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
  /// Records from every fetched page, in fetch order
  pub accumulated: Vec<Transaction>,
  /// Cursor for the next page, `None` before the first fetch and after the last page
  pub next_cursor: Option<Cursor>,
  /// The most recent page had no next cursor
  pub exhausted: bool,
  /// At least one page arrived since the last invalidation
  pub fetched: bool,
}

pub struct FeedCache {
  fetcher: Arc<dyn PageFetcher>,
  state: FeedState,
  loading: LoadingFlag,
}

impl FeedCache {
  pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
    Self {
      fetcher,
      state: FeedState::default(),
      loading: LoadingFlag::default(),
    }
  }

  /// Fetch the page after the last one and append it.
  ///
  /// Once exhausted this returns the current state without calling the
  /// fetcher. On failure nothing changes and the error is returned.
  pub async fn fetch_next_page(&mut self) -> Result<&FeedState, FetchError> {
    if self.state.exhausted {
      debug!("feed exhausted, not fetching");
      return Ok(&self.state);
    }

    let _loading = self.loading.begin();
    debug!(cursor = ?self.state.next_cursor, "fetching page");

    let page = self
      .fetcher
      .fetch_page(self.state.next_cursor.as_ref())
      .await
      .inspect_err(|e| warn!(error = %e, "page fetch failed"))?;

    debug!(
      records = page.records.len(),
      next = ?page.next_cursor,
      "page fetched"
    );

    self.state.accumulated.extend(page.records);
    self.state.exhausted = page.next_cursor.is_none();
    self.state.next_cursor = page.next_cursor;
    self.state.fetched = true;

    Ok(&self.state)
  }

  /// Forget every page. Does not fetch.
  pub fn invalidate(&mut self) {
    self.state = FeedState::default();
  }

  pub fn current_state(&self) -> &FeedState {
    &self.state
  }

  pub fn loading(&self) -> &LoadingFlag {
    &self.loading
  }
}
