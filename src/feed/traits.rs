//! Collaborator contracts the synchronization core consumes.
//!
//! Implementations own the transport. Timeouts, retries and authentication
//! are their concern, the core only sees a value or a [`FetchError`].

use async_trait::async_trait;

use super::error::FetchError;
use super::types::{Cursor, Employee, Page, Transaction};

/// Fetches one page of the unfiltered transaction feed.
#[async_trait]
pub trait PageFetcher: Send + Sync {
  /// `None` always means the first page.
  async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<Page, FetchError>;
}

/// Fetches every transaction belonging to one employee.
#[async_trait]
pub trait EmployeeFeedFetcher: Send + Sync {
  async fn fetch_for_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, FetchError>;
}

/// Fetches the employee directory.
#[async_trait]
pub trait DirectoryFetcher: Send + Sync {
  async fn fetch_all(&self) -> Result<Vec<Employee>, FetchError>;
}
