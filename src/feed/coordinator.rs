//! Filter state machine over the two transaction feeds.
//!
//! The coordinator owns the [`Selection`] and both caches. What the operator
//! sees is always [`SelectionCoordinator::current_view`], a pure function of
//! the selection and the cache states:
//!
//! | selection        | view                                           |
//! |------------------|------------------------------------------------|
//! | `Unfiltered`     | feed accumulation, once a page has arrived     |
//! | `ByEmployee(id)` | employee records, once a fetch for `id` landed |
//!
//! Switching to an employee drops the feed accumulation, and switching back
//! to `Unfiltered` always reloads from the first page, so pages from before
//! and after a filter change are never spliced together.

use tracing::{debug, info};

use super::directory::DirectoryCache;
use super::employee_cache::EmployeeFeedCache;
use super::error::FetchError;
use super::feed_cache::FeedCache;
use super::loading::LoadingFlags;
use super::types::{Employee, Selection, Transaction};

#[cfg(test)]
use super::employee_cache::EmployeeFeedState;
#[cfg(test)]
use super::feed_cache::FeedState;
#[cfg(test)]
use super::traits::{DirectoryFetcher, EmployeeFeedFetcher, PageFetcher};
#[cfg(test)]
use std::sync::Arc;

pub struct SelectionCoordinator {
  selection: Selection,
  feed: FeedCache,
  employee_feed: EmployeeFeedCache,
  directory: DirectoryCache,
}

impl SelectionCoordinator {
  pub fn new(feed: FeedCache, employee_feed: EmployeeFeedCache, directory: DirectoryCache) -> Self {
    Self {
      selection: Selection::Unfiltered,
      feed,
      employee_feed,
      directory,
    }
  }

  /// Build fresh caches over a single object that serves every feed.
  #[cfg(test)]
  pub fn from_api<A>(api: Arc<A>) -> Self
  where
    A: PageFetcher + EmployeeFeedFetcher + DirectoryFetcher + 'static,
  {
    Self::new(
      FeedCache::new(api.clone()),
      EmployeeFeedCache::new(api.clone()),
      DirectoryCache::new(api),
    )
  }

  /// Show every transaction, reloading from the first page.
  ///
  /// Also loads the directory if it is missing. A directory failure does not
  /// stop the page reload; it is reported after the page has been fetched.
  pub async fn select_all(&mut self) -> Result<(), FetchError> {
    if !self.selection.is_unfiltered() {
      info!("switching to all transactions");
    }
    self.selection = Selection::Unfiltered;
    self.employee_feed.invalidate();

    let directory = self.directory.ensure_loaded().await.map(|_| ());

    self.feed.invalidate();
    self.feed.fetch_next_page().await?;

    directory
  }

  /// Append the next page while unfiltered. No-op otherwise, or once exhausted.
  pub async fn select_load_more(&mut self) -> Result<(), FetchError> {
    if !self.selection.is_unfiltered() {
      debug!("load more ignored while filtered by employee");
      return Ok(());
    }

    self.feed.fetch_next_page().await.map(|_| ())
  }

  /// Show one employee's transactions.
  ///
  /// [`NO_FILTER_ID`](super::types::NO_FILTER_ID) behaves exactly like
  /// [`select_all`](Self::select_all). Ids missing from the directory are
  /// still fetched, and a repeated id is refetched.
  ///
  /// The selection moves and the feed accumulation is dropped before the
  /// fetch, so on failure the view is `None` until a retry succeeds.
  pub async fn select_employee(&mut self, employee_id: &str) -> Result<(), FetchError> {
    match Selection::from_employee_id(employee_id) {
      Selection::Unfiltered => self.select_all().await,
      Selection::ByEmployee(employee_id) => {
        if self.directory.is_loaded() && self.directory.find(&employee_id).is_none() {
          debug!(%employee_id, "employee not in directory, fetching anyway");
        }
        info!(%employee_id, "filtering by employee");

        self.selection = Selection::ByEmployee(employee_id.clone());
        self.feed.invalidate();
        self.employee_feed.fetch_for(&employee_id).await.map(|_| ())
      }
    }
  }

  /// Records to display, or `None` when the authoritative cache has no
  /// completed fetch for the current selection yet.
  pub fn current_view(&self) -> Option<&[Transaction]> {
    match &self.selection {
      Selection::Unfiltered => {
        let state = self.feed.current_state();
        state.fetched.then_some(state.accumulated.as_slice())
      }
      Selection::ByEmployee(employee_id) => self.employee_feed.current_state().records_for(employee_id),
    }
  }

  pub fn has_more(&self) -> bool {
    self.selection.is_unfiltered() && !self.feed.current_state().exhausted
  }

  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  /// Human readable name of the current filter
  pub fn selection_label(&self) -> String {
    match &self.selection {
      Selection::Unfiltered => "All employees".to_string(),
      Selection::ByEmployee(employee_id) => self
        .directory
        .find(employee_id)
        .map(Employee::display_name)
        .unwrap_or_else(|| employee_id.clone()),
    }
  }

  pub fn directory(&self) -> Option<&[Employee]> {
    self.directory.employees()
  }

  #[cfg(test)]
  pub fn feed_state(&self) -> &FeedState {
    self.feed.current_state()
  }

  #[cfg(test)]
  pub fn employee_feed_state(&self) -> &EmployeeFeedState {
    self.employee_feed.current_state()
  }

  /// Handles that keep reporting loading state while an operation runs elsewhere.
  pub fn loading_flags(&self) -> LoadingFlags {
    LoadingFlags {
      feed: self.feed.loading().clone(),
      employee_feed: self.employee_feed.loading().clone(),
      directory: self.directory.loading().clone(),
    }
  }
}
