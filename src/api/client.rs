use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::{Host, Url};

use super::api_types::{
  into_transactions, ApiApprovalRequest, ApiEmployee, ApiPaginatedResponse, ApiTransaction,
};
use super::ApprovalSetter;
use crate::feed::{
  Cursor, DirectoryFetcher, Employee, EmployeeFeedFetcher, FetchError, Page, PageFetcher,
  Transaction,
};

/// HTTP client for the transactions API
#[derive(Clone)]
pub struct HttpApi {
  client: Client,
  base: Url,
  token: Option<String>,
}

impl HttpApi {
  pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self> {
    let base = Url::parse(base_url).map_err(|e| eyre!("Invalid API url {}: {}", base_url, e))?;
    if base.cannot_be_a_base() {
      return Err(eyre!("Invalid API url {}: cannot be a base", base_url));
    }

    let mut builder = Client::builder().timeout(timeout);
    // A local API is never reached through a proxy
    if is_loopback(&base) {
      builder = builder.no_proxy();
    }
    let client = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      base,
      token,
    })
  }

  /// `{base}/{endpoint}`, regardless of a trailing slash on the base
  fn endpoint_url(&self, endpoint: &str) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push(endpoint);
    }
    url
  }

  fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    }
  }

  async fn get<T: DeserializeOwned>(
    &self,
    what: &str,
    endpoint: &str,
    query: &[(&str, &str)],
  ) -> Result<T, FetchError> {
    let url = self.endpoint_url(endpoint);
    debug!(%url, ?query, "GET");

    let response = self
      .authorize(self.client.get(url).query(query))
      .send()
      .await
      .map_err(|e| FetchError::transport(what, e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::rejected(what, status));
    }

    response
      .json::<T>()
      .await
      .map_err(|e| FetchError::decode(what, e))
  }
}

fn is_loopback(url: &Url) -> bool {
  match url.host() {
    Some(Host::Domain(domain)) => domain == "localhost",
    Some(Host::Ipv4(ip)) => ip.is_loopback(),
    Some(Host::Ipv6(ip)) => ip.is_loopback(),
    None => false,
  }
}

#[async_trait]
impl PageFetcher for HttpApi {
  async fn fetch_page(&self, cursor: Option<&Cursor>) -> Result<Page, FetchError> {
    let page = cursor.map(Cursor::as_str).unwrap_or("0");
    let response: ApiPaginatedResponse = self
      .get(
        "transactions page",
        "paginatedTransactions",
        &[("page", page)],
      )
      .await?;

    Ok(Page {
      records: into_transactions(response.data)?,
      next_cursor: response.next_page.map(|n| Cursor::new(n.to_string())),
    })
  }
}

#[async_trait]
impl EmployeeFeedFetcher for HttpApi {
  async fn fetch_for_employee(&self, employee_id: &str) -> Result<Vec<Transaction>, FetchError> {
    let response: Vec<ApiTransaction> = self
      .get(
        "employee transactions",
        "transactionsByEmployee",
        &[("employeeId", employee_id)],
      )
      .await?;

    into_transactions(response)
  }
}

#[async_trait]
impl DirectoryFetcher for HttpApi {
  async fn fetch_all(&self) -> Result<Vec<Employee>, FetchError> {
    let response: Vec<ApiEmployee> = self.get("employees", "employees", &[]).await?;
    Ok(response.into_iter().map(Employee::from).collect())
  }
}

#[async_trait]
impl ApprovalSetter for HttpApi {
  async fn set_approval(&self, transaction_id: &str, value: bool) -> Result<(), FetchError> {
    let what = format!("approval of {}", transaction_id);
    let url = self.endpoint_url("setTransactionApproval");
    debug!(%url, transaction_id, value, "POST");

    let response = self
      .authorize(self.client.post(url).json(&ApiApprovalRequest {
        transaction_id,
        value,
      }))
      .send()
      .await
      .map_err(|e| FetchError::transport(&what, e))?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::rejected(&what, status));
    }

    Ok(())
  }
}
