//! Synchronization core for the transaction list.
//!
//! Two feeds overlap here: the cursor-paginated feed of every transaction and
//! the per-employee feed. Each has its own cache, and a
//! [`SelectionCoordinator`] decides which one the operator is looking at and
//! invalidates the other whenever the filter changes.
//!
//! The core is transport-agnostic. Fetching goes through the traits in
//! [`traits`], and every failure surfaces as a [`FetchError`] with state left
//! as it was.

mod coordinator;
mod directory;
mod employee_cache;
mod error;
mod feed_cache;
mod loading;
#[cfg(test)]
pub mod testing;
mod traits;
mod types;

pub use coordinator::SelectionCoordinator;
pub use directory::DirectoryCache;
pub use employee_cache::EmployeeFeedCache;
pub use error::FetchError;
pub use feed_cache::FeedCache;
pub use loading::LoadingFlags;
pub use traits::{DirectoryFetcher, EmployeeFeedFetcher, PageFetcher};
pub use types::{Cursor, Employee, Page, Selection, Transaction, NO_FILTER_ID};
