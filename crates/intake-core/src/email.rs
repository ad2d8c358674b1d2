//! The `EmailClient` trait: the transactional email collaborator.

use std::future::Future;

use serde::Serialize;

/// One rendered email, ready to hand to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
  /// Sender, e.g. `"Site Owner <noreply@example.com>"`.
  pub from:    String,
  pub to:      Vec<String>,
  pub subject: String,
  pub html:    String,
}

/// What the provider reported back for an accepted email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Delivery {
  /// Provider-assigned message id, when the provider returns one.
  pub provider_id: Option<String>,
}

/// A transactional email API.
///
/// Each call is one independent delivery attempt; implementations do not
/// retry.
pub trait EmailClient: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send(
    &self,
    email: OutgoingEmail,
  ) -> impl Future<Output = Result<Delivery, Self::Error>> + Send + '_;
}
