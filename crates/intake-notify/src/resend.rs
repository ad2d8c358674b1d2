//! [`ResendClient`]: an [`EmailClient`] for the Resend transactional email
//! API.

use std::time::Duration;

use intake_core::email::{Delivery, EmailClient, OutgoingEmail};
use reqwest::Client;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("email rejected by provider ({status}): {message}")]
  Api { status: u16, message: String },
}

/// Connection settings for the Resend API.
#[derive(Debug, Clone)]
pub struct ResendConfig {
  pub api_key:  SecretString,
  pub base_url: String,
  /// Per-request timeout applied by the HTTP client.
  pub timeout:  Duration,
}

/// Async client for `POST /emails`.
///
/// Clones share the inner [`reqwest::Client`] connection pool.
#[derive(Debug, Clone)]
pub struct ResendClient {
  client:   Client,
  api_key:  SecretString,
  base_url: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
  from:    &'a str,
  to:      &'a [String],
  subject: &'a str,
  html:    &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
  id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
  message: Option<String>,
}

impl ResendClient {
  pub fn new(config: ResendConfig) -> Result<Self, Error> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      client,
      api_key: config.api_key,
      base_url: config.base_url.trim_end_matches('/').to_owned(),
    })
  }
}

impl EmailClient for ResendClient {
  type Error = Error;

  async fn send(&self, email: OutgoingEmail) -> Result<Delivery, Error> {
    let resp = self
      .client
      .post(format!("{}/emails", self.base_url))
      .bearer_auth(self.api_key.expose_secret())
      .json(&SendRequest {
        from:    &email.from,
        to:      &email.to,
        subject: &email.subject,
        html:    &email.html,
      })
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or(body);
      return Err(Error::Api { status: status.as_u16(), message });
    }

    let body: SendResponse = resp.json().await?;
    Ok(Delivery { provider_id: body.id })
  }
}
