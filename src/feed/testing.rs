//! Scripted collaborators with call counters for exercising the caches.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::error::FetchError;
use super::traits::{DirectoryFetcher, EmployeeFeedFetcher, PageFetcher};
use super::types::{Cursor, Employee, Page, Transaction};

pub fn employee(id: &str, first_name: &str, last_name: &str) -> Employee {
  Employee {
    id: id.to_string(),
    first_name: first_name.to_string(),
    last_name: last_name.to_string(),
  }
}

pub fn transaction(id: &str, employee_id: &str) -> Transaction {
  Transaction {
    id: id.to_string(),
    amount: Decimal::new(1250, 2),
    employee: employee(employee_id, "Test", "Employee"),
    merchant: format!("Merchant {}", id),
    date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    approved: false,
  }
}

pub fn transactions(ids: &[&str], employee_id: &str) -> Vec<Transaction> {
  ids.iter().map(|id| transaction(id, employee_id)).collect()
}

/// In-memory stand-in for every collaborator.
///
/// Pages are keyed by the cursor that requests them (`None` = first page).
/// Unknown cursors and unknown employees answer with empty results.
#[derive(Default)]
pub struct MockApi {
  pages: Mutex<HashMap<Option<String>, Page>>,
  by_employee: Mutex<HashMap<String, Vec<Transaction>>>,
  employees: Mutex<Vec<Employee>>,
  cursors_seen: Mutex<Vec<Option<String>>>,
  pub page_calls: AtomicUsize,
  pub employee_calls: AtomicUsize,
  pub directory_calls: AtomicUsize,
  pub fail_pages: AtomicBool,
  pub fail_employee: AtomicBool,
  pub fail_directory: AtomicBool,
}

impl MockApi {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn set_page(&self, cursor: Option<&str>, records: Vec<Transaction>, next: Option<&str>) {
    self.pages.lock().unwrap().insert(
      cursor.map(String::from),
      Page {
        records,
        next_cursor: next.map(Cursor::new),
      },
    );
  }

  pub fn set_employee_records(&self, employee_id: &str, records: Vec<Transaction>) {
    self
      .by_employee
      .lock()
      .unwrap()
      .insert(employee_id.to_string(), records);
  }

  pub fn set_employees(&self, employees: Vec<Employee>) {
    *self.employees.lock().unwrap() = employees;
  }

  pub fn cursors_seen(&self) -> Vec<Option<String>> {
    self.cursors_seen.lock().unwrap().clone()
  }

  pub fn page_calls(&self) -> usize {
    self.page_calls.load(Ordering::SeqCst)
  }

  pub fn employee_calls(&self) -> usize {
    self.employee_calls.load(Ordering::SeqCst)
  }

  pub fn directory_calls(&self) -> usize {
    self.directory_calls.load(Ordering::SeqCst)
  }

  pub fn fail_pages(&self, fail: bool) {
    self.fail_pages.store(fail, Ordering::SeqCst);
  }

  pub fn fail_employee(&self, fail: bool) {
    self.fail_employee.store(fail, Ordering::SeqCst);
  }

  pub fn fail_directory(&self, fail: bool) {
    self.fail_directory.store(fail, Ordering::SeqCst);
  }
}

#[async_trait]
impl PageFetcher for MockApi {
  async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
    self.page_calls.fetch_add(1, Ordering::SeqCst);
    let key = cursor.map(|c| c.as_str().to_string());
    self.cursors_seen.lock().unwrap().push(key.clone());

    if self.fail_pages.load(Ordering::SeqCst) {
      return Err(FetchError::transport("page", "connection reset"));
    }

    Ok(
      self
        .pages
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or(Page {
          records: Vec::new(),
          next_cursor: None,
        }),
    )
  }
}

#[async_trait]
impl EmployeeFeedFetcher for MockApi {
  async fn fetch_for_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, FetchError> {
    self.employee_calls.fetch_add(1, Ordering::SeqCst);

    if self.fail_employee.load(Ordering::SeqCst) {
      return Err(FetchError::transport("employee transactions", "timed out"));
    }

    Ok(
      self
        .by_employee
        .lock()
        .unwrap()
        .get(employee_id)
        .cloned()
        .unwrap_or_default(),
    )
  }
}

#[async_trait]
impl DirectoryFetcher for MockApi {
  async fn fetch_all(&self) -> Result<Vec<Employee>, FetchError> {
    self.directory_calls.fetch_add(1, Ordering::SeqCst);

    if self.fail_directory.load(Ordering::SeqCst) {
      return Err(FetchError::transport("employees", "service unavailable"));
    }

    Ok(self.employees.lock().unwrap().clone())
  }
}
