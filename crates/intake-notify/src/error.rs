//! Error types for `intake-notify`.

use std::{fmt, time::Duration};

use intake_core::email::Delivery;
use serde::Serialize;
use thiserror::Error;

/// Which of the two notification emails an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
  /// The confirmation sent back to the visitor.
  Acknowledgment,
  /// The alert sent to the site owner.
  OwnerAlert,
}

impl fmt::Display for EmailKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Acknowledgment => "acknowledgment",
      Self::OwnerAlert => "owner_alert",
    })
  }
}

/// Why a single send failed.
#[derive(Debug, Error)]
pub enum SendError {
  #[error("no answer from the email provider within {0:?}")]
  Timeout(Duration),

  #[error("email provider error: {0}")]
  Provider(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
#[error("{kind} email failed: {error}")]
pub struct SendFailure {
  pub kind:  EmailKind,
  #[source]
  pub error: SendError,
}

/// At least one of the two notification emails was not sent.
///
/// The sends are independent, so `delivered` may still hold the other one.
#[derive(Debug, Error)]
#[error("notification incomplete: {}", describe(.failures))]
pub struct NotificationError {
  pub failures:  Vec<SendFailure>,
  pub delivered: Vec<(EmailKind, Delivery)>,
}

impl NotificationError {
  /// Whether the email of `kind` is among the failures.
  pub fn failed(&self, kind: EmailKind) -> bool {
    self.failures.iter().any(|f| f.kind == kind)
  }
}

fn describe(failures: &[SendFailure]) -> String {
  failures
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}
