//! Error types for request and filter construction

use crate::builder::FieldKind;

/// Errors raised while building a report request or one of its filter clauses.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
  /// A mutator tried to write a field with the wrong kind (scalar vs list).
  #[error("field '{field}' holds a {found}, cannot treat it as a {expected}")]
  Configuration {
    field: String,
    expected: FieldKind,
    found: FieldKind,
  },

  /// A filter clause was materialized before its required parts were set.
  #[error("incomplete filter clause: {missing} not set")]
  IncompleteFilter { missing: &'static str },

  /// The materialized state does not fit the request schema.
  #[error("request state does not match the report schema: {0}")]
  Shape(#[source] serde_json::Error),

  /// A descriptor could not be converted into its JSON form.
  #[error("failed to serialize entry: {0}")]
  Serialize(#[from] serde_json::Error),
}

impl BuildError {
  /// True for the scalar/list mismatch family.
  pub fn is_configuration(&self) -> bool {
    matches!(self, BuildError::Configuration { .. })
  }
}

pub type Result<T> = std::result::Result<T, BuildError>;
