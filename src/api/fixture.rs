//! In-memory transactions API backed by a JSON dataset.
//!
//! Pages are fixed-size slices of the transaction list and the cursor is the
//! page number. Approval changes are kept in memory for the session.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use super::api_types::{into_transactions, ApiDataset};
use super::ApprovalSetter;
use crate::feed::{
  Cursor, DirectoryFetcher, Employee, EmployeeFeedFetcher, FetchError, Page, PageFetcher,
  Transaction,
};

/// Dataset compiled into the binary, used when no fixture path is configured
const DEMO_DATASET: &str = include_str!("../../fixtures/demo.json");

pub const DEFAULT_PAGE_SIZE: usize = 5;

pub struct FixtureApi {
  data: RwLock<ApiDataset>,
  page_size: usize,
  latency: Duration,
}

impl FixtureApi {
  pub fn new(dataset: ApiDataset, page_size: usize, latency: Duration) -> Self {
    Self {
      data: RwLock::new(dataset),
      page_size: page_size.max(1),
      latency,
    }
  }

  /// Load a dataset from `path`, or the bundled demo dataset when `None`.
  pub fn load(path: Option<&Path>, page_size: usize, latency: Duration) -> Result<Self> {
    let dataset = match path {
      Some(p) => {
        let contents = std::fs::read_to_string(p)
          .map_err(|e| eyre!("Failed to read fixture {}: {}", p.display(), e))?;
        serde_json::from_str(&contents)
          .map_err(|e| eyre!("Failed to parse fixture {}: {}", p.display(), e))?
      }
      None => serde_json::from_str(DEMO_DATASET)
        .map_err(|e| eyre!("Failed to parse bundled dataset: {}", e))?,
    };

    Ok(Self::new(dataset, page_size, latency))
  }

  async fn simulate_latency(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

#[async_trait]
impl PageFetcher for FixtureApi {
  async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
    self.simulate_latency().await;

    let page = match cursor {
      Some(c) => c
        .as_str()
        .parse::<usize>()
        .map_err(|e| FetchError::decode(&format!("cursor {}", c), e))?,
      None => 0,
    };

    let data = self.data.read().await;
    let total = data.transactions.len();
    let start = page.saturating_mul(self.page_size);
    if start > total || (start == total && page > 0) {
      return Err(FetchError::rejected(
        &format!("page {}", page),
        "page out of range",
      ));
    }
    let end = (start + self.page_size).min(total);

    debug!(page, start, end, total, "serving fixture page");

    let records = into_transactions(data.transactions[start..end].to_vec())?;
    let next_cursor = (end < total).then(|| Cursor::new((page + 1).to_string()));

    Ok(Page {
      records,
      next_cursor,
    })
  }
}

#[async_trait]
impl EmployeeFeedFetcher for FixtureApi {
  async fn fetch_for_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, FetchError> {
    self.simulate_latency().await;

    if employee_id.is_empty() {
      return Err(FetchError::rejected(
        "employee transactions",
        "Employee id cannot be empty",
      ));
    }

    let data = self.data.read().await;
    let matching = data
      .transactions
      .iter()
      .filter(|t| t.employee.id == employee_id)
      .cloned()
      .collect();

    into_transactions(matching)
  }
}

#[async_trait]
impl DirectoryFetcher for FixtureApi {
  async fn fetch_all(&self) -> Result<Vec<Employee>, FetchError> {
    self.simulate_latency().await;

    let data = self.data.read().await;
    Ok(data.employees.iter().cloned().map(Employee::from).collect())
  }
}

#[async_trait]
impl ApprovalSetter for FixtureApi {
  async fn set_approval(&self, transaction_id: &str, value: bool) -> Result<(), FetchError> {
    self.simulate_latency().await;

    let mut data = self.data.write().await;
    let transaction = data
      .transactions
      .iter_mut()
      .find(|t| t.id == transaction_id)
      .ok_or_else(|| {
        FetchError::rejected(
          &format!("approval of {}", transaction_id),
          "Invalid transaction to approve",
        )
      })?;

    transaction.approved = value;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::feed::SelectionCoordinator;
  use std::sync::Arc;

  fn demo(page_size: usize) -> FixtureApi {
    FixtureApi::load(None, page_size, Duration::ZERO).unwrap()
  }

  #[tokio::test]
  async fn test_bundled_dataset_loads() {
    let api = demo(DEFAULT_PAGE_SIZE);
    let employees = api.fetch_all().await.unwrap();
    assert!(!employees.is_empty());
  }

  #[tokio::test]
  async fn test_pages_walk_whole_dataset() {
    let api = demo(4);
    let total = api.data.read().await.transactions.len();

    let mut cursor = None;
    let mut seen = 0;
    loop {
      let page = api.fetch_page(cursor.as_ref()).await.unwrap();
      assert!(page.records.len() <= 4);
      seen += page.records.len();
      match page.next_cursor {
        Some(next) => cursor = Some(next),
        None => break,
      }
    }

    assert_eq!(seen, total);
  }

  #[tokio::test]
  async fn test_first_page_cursor_is_one() {
    let api = demo(2);
    let page = api.fetch_page(None).await.unwrap();
    assert_eq!(page.next_cursor, Some(Cursor::new("1")));
  }

  #[tokio::test]
  async fn test_out_of_range_page_is_rejected() {
    let api = demo(DEFAULT_PAGE_SIZE);
    assert!(api.fetch_page(Some(&Cursor::new("999"))).await.is_err());
    assert!(api.fetch_page(Some(&Cursor::new("abc"))).await.is_err());
  }

  #[tokio::test]
  async fn test_employee_filter() {
    let api = demo(DEFAULT_PAGE_SIZE);
    let employee = api.fetch_all().await.unwrap().remove(0);

    let records = api.fetch_for_employee(&employee.id).await.unwrap();
    assert!(!records.is_empty());
    assert!(records.iter().all(|t| t.employee.id == employee.id));

    assert!(api.fetch_for_employee("no-such-employee").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_empty_employee_id_is_rejected() {
    let api = demo(DEFAULT_PAGE_SIZE);
    let err = api.fetch_for_employee("").await.unwrap_err();
    assert!(err.message().contains("Employee id cannot be empty"));
  }

  #[tokio::test]
  async fn test_approval_is_visible_on_refetch() {
    let api = demo(DEFAULT_PAGE_SIZE);
    let first = api.fetch_page(None).await.unwrap().records.remove(0);

    api.set_approval(&first.id, !first.approved).await.unwrap();

    let again = api.fetch_page(None).await.unwrap().records.remove(0);
    assert_eq!(again.id, first.id);
    assert_eq!(again.approved, !first.approved);

    assert!(api.set_approval("missing", true).await.is_err());
  }

  #[tokio::test]
  async fn test_drives_coordinator() {
    let api = Arc::new(demo(DEFAULT_PAGE_SIZE));
    let mut coordinator = SelectionCoordinator::from_api(api.clone());

    coordinator.select_all().await.unwrap();
    assert_eq!(coordinator.current_view().map(|v| v.len()), Some(DEFAULT_PAGE_SIZE));
    assert!(coordinator.has_more());

    let employee_id = coordinator.directory().unwrap()[0].id.clone();
    coordinator.select_employee(&employee_id).await.unwrap();
    assert!(coordinator
      .current_view()
      .unwrap()
      .iter()
      .all(|t| t.employee.id == employee_id));
  }
}
