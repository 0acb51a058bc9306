//! Transports for the transactions API.
//!
//! Both backends implement every fetch trait of the core plus
//! [`ApprovalSetter`]. [`Backend`] erases which one is in use.

pub mod api_types;
pub mod client;
pub mod fixture;

use async_trait::async_trait;
use color_eyre::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{Config, SourceConfig};
use crate::feed::{
  DirectoryCache, DirectoryFetcher, EmployeeFeedCache, EmployeeFeedFetcher, FeedCache, FetchError,
  PageFetcher, SelectionCoordinator,
};
use client::HttpApi;
use fixture::FixtureApi;

/// Marks a transaction approved or not.
///
/// Lives outside the core: records stay immutable there and pick up the new
/// flag on the next fetch.
#[async_trait]
pub trait ApprovalSetter: Send + Sync {
  async fn set_approval(&self, transaction_id: &str, value: bool) -> Result<(), FetchError>;
}

/// The configured API, shared by every cache and the approval toggle
#[derive(Clone)]
pub struct Backend {
  pages: Arc<dyn PageFetcher>,
  employee_feed: Arc<dyn EmployeeFeedFetcher>,
  directory: Arc<dyn DirectoryFetcher>,
  approvals: Arc<dyn ApprovalSetter>,
  description: String,
}

impl Backend {
  pub fn connect(source: &SourceConfig) -> Result<Self> {
    match source {
      SourceConfig::Fixture {
        path,
        page_size,
        latency_ms,
      } => {
        let api = FixtureApi::load(
          path.as_deref(),
          *page_size,
          Duration::from_millis(*latency_ms),
        )?;
        let description = match path {
          Some(p) => format!("fixture {}", p.display()),
          None => "demo data".to_string(),
        };
        info!(%description, page_size, "using fixture backend");
        Ok(Self::from_api(Arc::new(api), description))
      }
      SourceConfig::Http { url, timeout_secs } => {
        let api = HttpApi::new(
          url,
          Duration::from_secs(*timeout_secs),
          Config::get_api_token(),
        )?;
        info!(%url, "using http backend");
        Ok(Self::from_api(Arc::new(api), url.clone()))
      }
    }
  }

  pub fn from_api<A>(api: Arc<A>, description: String) -> Self
  where
    A: PageFetcher + EmployeeFeedFetcher + DirectoryFetcher + ApprovalSetter + 'static,
  {
    Self {
      pages: api.clone(),
      employee_feed: api.clone(),
      directory: api.clone(),
      approvals: api,
      description,
    }
  }

  /// A coordinator with empty caches over this backend
  pub fn coordinator(&self) -> SelectionCoordinator {
    SelectionCoordinator::new(
      FeedCache::new(self.pages.clone()),
      EmployeeFeedCache::new(self.employee_feed.clone()),
      DirectoryCache::new(self.directory.clone()),
    )
  }

  pub fn approvals(&self) -> Arc<dyn ApprovalSetter> {
    self.approvals.clone()
  }

  pub fn description(&self) -> &str {
    &self.description
  }
}
