use std::fmt::Display;
use thiserror::Error;

/// A fetch collaborator failed.
///
/// Every failure is handled the same way: state stays as it was and the
/// message is shown to the operator, so the cause is not broken out into
/// variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
  message: String,
}

impl FetchError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  /// The request never produced a response
  pub fn transport(what: &str, err: impl Display) -> Self {
    Self::new(format!("Failed to fetch {}: {}", what, err))
  }

  /// A response arrived but could not be turned into records
  pub fn decode(what: &str, err: impl Display) -> Self {
    Self::new(format!("Failed to parse {}: {}", what, err))
  }

  /// The collaborator answered with a refusal
  pub fn rejected(what: &str, reason: impl Display) -> Self {
    Self::new(format!("Request for {} was rejected: {}", what, reason))
  }

  pub fn message(&self) -> &str {
    &self.message
  }
}
