use std::sync::Arc;
use tracing::{debug, warn};

use super::error::FetchError;
use super::loading::LoadingFlag;
use super::traits::EmployeeFeedFetcher;
use super::types::Transaction;

/// Last successful employee-filtered result.
///
/// Replaced wholesale by each fetch, never appended to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFeedState {
  pub employee_id: Option<String>,
  /// `None` until a fetch completes
  pub records: Option<Vec<Transaction>>,
}

impl EmployeeFeedState {
  /// Records fetched for exactly this employee, if any
  pub fn records_for(&self, employee_id: &str) -> Option<&[Transaction]> {
    if self.employee_id.as_deref() == Some(employee_id) {
      self.records.as_deref()
    } else {
      None
    }
  }
}

pub struct EmployeeFeedCache {
  fetcher: Arc<dyn EmployeeFeedFetcher>,
  state: EmployeeFeedState,
  loading: LoadingFlag,
}

impl EmployeeFeedCache {
  pub fn new(fetcher: Arc<dyn EmployeeFeedFetcher>) -> Self {
    Self {
      fetcher,
      state: EmployeeFeedState::default(),
      loading: LoadingFlag::default(),
    }
  }

  /// Always fetch fresh, even for the id already held.
  pub async fn fetch_for(&mut self, employee_id: &str) -> Result<&[Transaction], FetchError> {
    let _loading = self.loading.begin();
    debug!(employee_id, "fetching employee transactions");

    let records = self
      .fetcher
      .fetch_for_employee(employee_id)
      .await
      .inspect_err(|e| warn!(employee_id, error = %e, "employee fetch failed"))?;

    debug!(employee_id, records = records.len(), "employee transactions fetched");

    self.state = EmployeeFeedState {
      employee_id: Some(employee_id.to_string()),
      records: Some(records),
    };

    Ok(self.state.records.as_deref().unwrap_or_default())
  }

  pub fn invalidate(&mut self) {
    self.state = EmployeeFeedState::default();
  }

  pub fn current_state(&self) -> &EmployeeFeedState {
    &self.state
  }

  pub fn loading(&self) -> &LoadingFlag {
    &self.loading
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::feed::testing::{transactions, MockApi};

  #[tokio::test]
  async fn test_fetch_replaces_previous_result() {
    let api = MockApi::new();
    api.set_employee_records("e1", transactions(&["a1", "a2"], "e1"));
    api.set_employee_records("e2", transactions(&["b1"], "e2"));

    let mut cache = EmployeeFeedCache::new(api.clone());
    assert_eq!(cache.fetch_for("e1").await.unwrap().len(), 2);
    assert_eq!(cache.fetch_for("e2").await.unwrap().len(), 1);

    let state = cache.current_state();
    assert_eq!(state.employee_id.as_deref(), Some("e2"));
    assert_eq!(state.records.as_ref().map(Vec::len), Some(1));
    assert_eq!(state.records_for("e1"), None);
  }

  #[tokio::test]
  async fn test_same_id_is_refetched() {
    let api = MockApi::new();
    let mut cache = EmployeeFeedCache::new(api.clone());

    cache.fetch_for("e1").await.unwrap();
    cache.fetch_for("e1").await.unwrap();

    assert_eq!(api.employee_calls(), 2);
  }

  #[tokio::test]
  async fn test_unknown_employee_is_empty_not_missing() {
    let api = MockApi::new();
    let mut cache = EmployeeFeedCache::new(api.clone());

    assert!(cache.current_state().records_for("ghost").is_none());
    assert!(cache.fetch_for("ghost").await.unwrap().is_empty());
    assert_eq!(
      cache.current_state().records_for("ghost"),
      Some(&[][..])
    );
  }

  #[tokio::test]
  async fn test_failure_keeps_last_result() {
    let api = MockApi::new();
    api.set_employee_records("e1", transactions(&["a1"], "e1"));

    let mut cache = EmployeeFeedCache::new(api.clone());
    cache.fetch_for("e1").await.unwrap();
    let before = cache.current_state().clone();

    api.fail_employee(true);
    assert!(cache.fetch_for("e2").await.is_err());
    assert_eq!(cache.current_state(), &before);
  }

  #[tokio::test]
  async fn test_invalidate_clears_state() {
    let api = MockApi::new();
    api.set_employee_records("e1", transactions(&["a1"], "e1"));

    let mut cache = EmployeeFeedCache::new(api.clone());
    cache.fetch_for("e1").await.unwrap();
    cache.invalidate();

    assert_eq!(cache.current_state(), &EmployeeFeedState::default());
  }
}
