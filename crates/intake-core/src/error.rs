//! Error types for `intake-core`.

use std::{collections::BTreeMap, time::Duration};

use serde::Serialize;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ─── Validation ──────────────────────────────────────────────────────────────

/// Why a single form field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
  #[error("required field is empty")]
  MissingField,
  #[error("value is not in the expected format")]
  InvalidFormat,
}

/// Every rejected field of a submission, keyed by field name.
///
/// Serialises as a flat JSON object, e.g. `{"email":"invalid_format"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("invalid fields: {}", describe(.0))]
pub struct FieldErrors(BTreeMap<&'static str, FieldError>);

impl FieldErrors {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, field: &'static str, error: FieldError) {
    self.0.insert(field, error);
  }

  pub fn get(&self, field: &str) -> Option<FieldError> {
    self.0.get(field).copied()
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  /// Field names in a stable (alphabetical) order.
  pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.0.keys().copied()
  }
}

fn describe(errors: &BTreeMap<&'static str, FieldError>) -> String {
  errors
    .iter()
    .map(|(field, error)| format!("{field} ({error})"))
    .collect::<Vec<_>>()
    .join(", ")
}

// ─── Storage ─────────────────────────────────────────────────────────────────

/// A failure to durably record a submission.
///
/// Backends convert their own error type into this one; the orchestrator adds
/// [`StorageError::Timeout`] when the backend does not answer in time.
#[derive(Debug, Error)]
pub enum StorageError {
  /// The store could not be reached or its I/O failed.
  #[error("store unavailable: {0}")]
  Unavailable(#[source] BoxError),

  /// The row was rejected by a schema constraint.
  #[error("constraint violation: {0}")]
  Constraint(String),

  #[error("store did not respond within {0:?}")]
  Timeout(Duration),

  #[error("store error: {0}")]
  Backend(#[source] BoxError),
}
