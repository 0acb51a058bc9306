//! Serde types matching the transactions API payloads.
//!
//! Kept apart from the domain types in [`crate::feed`] so the wire format can
//! stay loose (string dates, camelCase) while the core works with parsed
//! values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::feed::{Employee, FetchError, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEmployee {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
}

impl From<ApiEmployee> for Employee {
  fn from(employee: ApiEmployee) -> Self {
    Employee {
      id: employee.id,
      first_name: employee.first_name,
      last_name: employee.last_name,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTransaction {
  pub id: String,
  pub amount: Decimal,
  pub employee: ApiEmployee,
  pub merchant: String,
  /// ISO 8601 date, e.g. `2021-06-15`
  pub date: String,
  #[serde(default)]
  pub approved: bool,
}

impl ApiTransaction {
  pub fn into_transaction(self) -> Result<Transaction, FetchError> {
    let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
      .map_err(|e| FetchError::decode(&format!("date of transaction {}", self.id), e))?;

    Ok(Transaction {
      id: self.id,
      amount: self.amount,
      employee: self.employee.into(),
      merchant: self.merchant,
      date,
      approved: self.approved,
    })
  }
}

pub fn into_transactions(items: Vec<ApiTransaction>) -> Result<Vec<Transaction>, FetchError> {
  items.into_iter().map(ApiTransaction::into_transaction).collect()
}

/// One page of `paginatedTransactions`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPaginatedResponse {
  pub data: Vec<ApiTransaction>,
  /// `null` on the last page
  pub next_page: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiApprovalRequest<'a> {
  pub transaction_id: &'a str,
  pub value: bool,
}

/// File layout of a fixture dataset
#[derive(Debug, Clone, Deserialize)]
pub struct ApiDataset {
  pub employees: Vec<ApiEmployee>,
  pub transactions: Vec<ApiTransaction>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_paginated_response() {
    let json = r#"{
      "data": [{
        "id": "tx-1",
        "amount": 84.5,
        "employee": { "id": "e1", "firstName": "Ada", "lastName": "Lovelace" },
        "merchant": "Uber",
        "date": "2021-06-15",
        "approved": true
      }],
      "nextPage": 1
    }"#;

    let response: ApiPaginatedResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.next_page, Some(1));

    let transactions = into_transactions(response.data).unwrap();
    assert_eq!(transactions[0].amount, Decimal::new(845, 1));
    assert_eq!(transactions[0].employee.display_name(), "Ada Lovelace");
    assert_eq!(
      transactions[0].date,
      NaiveDate::from_ymd_opt(2021, 6, 15).unwrap()
    );
    assert!(transactions[0].approved);
  }

  #[test]
  fn test_last_page_has_null_next_page() {
    let response: ApiPaginatedResponse =
      serde_json::from_str(r#"{ "data": [], "nextPage": null }"#).unwrap();
    assert_eq!(response.next_page, None);
  }

  #[test]
  fn test_bad_date_is_a_fetch_error() {
    let transaction = ApiTransaction {
      id: "tx-9".to_string(),
      amount: Decimal::ONE,
      employee: ApiEmployee {
        id: "e1".to_string(),
        first_name: "A".to_string(),
        last_name: "B".to_string(),
      },
      merchant: "Shop".to_string(),
      date: "yesterday".to_string(),
      approved: false,
    };

    let err = transaction.into_transaction().unwrap_err();
    assert!(err.message().contains("tx-9"));
  }

  #[test]
  fn test_approval_request_is_camel_case() {
    let body = serde_json::to_value(ApiApprovalRequest {
      transaction_id: "tx-1",
      value: true,
    })
    .unwrap();
    assert_eq!(
      body,
      serde_json::json!({ "transactionId": "tx-1", "value": true })
    );
  }
}
