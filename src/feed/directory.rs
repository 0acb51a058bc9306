use std::sync::Arc;
use tracing::{debug, warn};

use super::error::FetchError;
use super::loading::LoadingFlag;
use super::traits::DirectoryFetcher;
use super::types::Employee;

/// Employee directory, fetched once and then kept.
///
/// Advisory only: it labels the current filter, it never gates a fetch.
pub struct DirectoryCache {
  fetcher: Arc<dyn DirectoryFetcher>,
  employees: Option<Vec<Employee>>,
  loading: LoadingFlag,
}

impl DirectoryCache {
  pub fn new(fetcher: Arc<dyn DirectoryFetcher>) -> Self {
    Self {
      fetcher,
      employees: None,
      loading: LoadingFlag::default(),
    }
  }

  /// Fetch the directory unless it is already loaded.
  pub async fn ensure_loaded(&mut self) -> Result<&[Employee], FetchError> {
    if self.employees.is_none() {
      let _loading = self.loading.begin();
      debug!("fetching employee directory");

      let employees = self
        .fetcher
        .fetch_all()
        .await
        .inspect_err(|e| warn!(error = %e, "directory fetch failed"))?;

      debug!(employees = employees.len(), "employee directory fetched");
      self.employees = Some(employees);
    }

    Ok(self.employees.as_deref().unwrap_or_default())
  }

  pub fn is_loaded(&self) -> bool {
    self.employees.is_some()
  }

  pub fn employees(&self) -> Option<&[Employee]> {
    self.employees.as_deref()
  }

  pub fn find(&self, employee_id: &str) -> Option<&Employee> {
    self
      .employees
      .as_ref()
      .and_then(|list| list.iter().find(|e| e.id == employee_id))
  }

  pub fn loading(&self) -> &LoadingFlag {
    &self.loading
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::feed::testing::{employee, MockApi};

  #[tokio::test]
  async fn test_loads_once() {
    let api = MockApi::new();
    api.set_employees(vec![employee("e1", "Ada", "Lovelace")]);

    let mut directory = DirectoryCache::new(api.clone());
    assert!(!directory.is_loaded());

    directory.ensure_loaded().await.unwrap();
    directory.ensure_loaded().await.unwrap();

    assert_eq!(api.directory_calls(), 1);
    assert_eq!(
      directory.find("e1").map(Employee::display_name).as_deref(),
      Some("Ada Lovelace")
    );
    assert!(directory.find("e9").is_none());
  }

  #[tokio::test]
  async fn test_failure_leaves_unloaded_and_retries() {
    let api = MockApi::new();
    api.fail_directory(true);

    let mut directory = DirectoryCache::new(api.clone());
    assert!(directory.ensure_loaded().await.is_err());
    assert!(!directory.is_loaded());

    api.fail_directory(false);
    assert!(directory.ensure_loaded().await.unwrap().is_empty());
    assert!(directory.is_loaded());
    assert_eq!(api.directory_calls(), 2);
  }
}
