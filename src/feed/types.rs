use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// An employee known to the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
}

impl Employee {
  pub fn display_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A single card transaction. Never mutated once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
  pub id: String,
  pub amount: Decimal,
  pub employee: Employee,
  pub merchant: String,
  pub date: NaiveDate,
  pub approved: bool,
}

/// Opaque position in the paginated feed, handed out by the page fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
  pub fn new(value: impl Into<String>) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Cursor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// One page of the unfiltered feed.
///
/// `next_cursor` is `None` on the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
  pub records: Vec<Transaction>,
  pub next_cursor: Option<Cursor>,
}

/// Employee id that pickers use for "All employees".
pub const NO_FILTER_ID: &str = "";

/// The operator's current filter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
  #[default]
  Unfiltered,
  ByEmployee(String),
}

impl Selection {
  /// Build a selection from a picker id, mapping [`NO_FILTER_ID`] to `Unfiltered`.
  pub fn from_employee_id(employee_id: &str) -> Self {
    if employee_id == NO_FILTER_ID {
      Selection::Unfiltered
    } else {
      Selection::ByEmployee(employee_id.to_string())
    }
  }

  pub fn is_unfiltered(&self) -> bool {
    matches!(self, Selection::Unfiltered)
  }

  pub fn employee_id(&self) -> Option<&str> {
    match self {
      Selection::Unfiltered => None,
      Selection::ByEmployee(id) => Some(id),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_selection_from_empty_id_is_unfiltered() {
    assert_eq!(Selection::from_employee_id(""), Selection::Unfiltered);
    assert_eq!(
      Selection::from_employee_id("emp-1"),
      Selection::ByEmployee("emp-1".to_string())
    );
  }

  #[test]
  fn test_selection_employee_id() {
    assert_eq!(Selection::Unfiltered.employee_id(), None);
    assert_eq!(
      Selection::ByEmployee("emp-2".to_string()).employee_id(),
      Some("emp-2")
    );
  }

  #[test]
  fn test_display_name() {
    let employee = Employee {
      id: "emp-1".to_string(),
      first_name: "Ada".to_string(),
      last_name: "Lovelace".to_string(),
    };
    assert_eq!(employee.display_name(), "Ada Lovelace");
  }
}
