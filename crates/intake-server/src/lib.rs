//! HTTP front end for the contact intake service.
//!
//! Wires configuration into an [`Intake`] and serves its API under `/api`
//! with browser CORS and request tracing.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Router,
  http::{HeaderName, Method, header},
};
use intake_api::{Intake, SubmissionPolicy, api_router};
use intake_core::{email::EmailClient, store::MessageStore};
use intake_notify::{NotifierConfig, resend::ResendConfig};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `INTAKE__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  pub store_path:            PathBuf,
  /// Backstop for one store call; must exceed `store_busy_timeout_ms`.
  #[serde(default = "default_store_timeout")]
  pub store_timeout_secs:    u64,
  /// How long SQLite waits on a locked database before failing the write.
  #[serde(default = "default_busy_timeout")]
  pub store_busy_timeout_ms: u64,
  pub email:                 EmailSettings,
}

/// The `[email]` table.
#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
  pub api_key:             SecretString,
  #[serde(default = "default_base_url")]
  pub base_url:            String,
  pub owner_address:       String,
  pub owner_name:          String,
  pub acknowledgment_from: String,
  pub alert_from:          String,
  #[serde(default = "default_send_timeout")]
  pub timeout_secs:        u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_timeout() -> u64 { 5 }

fn default_busy_timeout() -> u64 { 2_000 }

fn default_base_url() -> String { intake_notify::resend::DEFAULT_BASE_URL.to_string() }

fn default_send_timeout() -> u64 { 10 }

/// A configuration that deserialised but cannot run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("`{0}` must be greater than zero")]
  Zero(&'static str),

  #[error(
    "`store_timeout_secs` ({timeout_ms} ms) must exceed `store_busy_timeout_ms` ({busy_ms} ms)"
  )]
  BackstopTooShort { timeout_ms: u64, busy_ms: u64 },
}

impl ServerConfig {
  /// Reject values that would fail every submission or every email.
  pub fn validate(&self) -> Result<(), ConfigError> {
    for (key, value) in [
      ("store_timeout_secs", self.store_timeout_secs),
      ("store_busy_timeout_ms", self.store_busy_timeout_ms),
      ("email.timeout_secs", self.email.timeout_secs),
    ] {
      if value == 0 {
        return Err(ConfigError::Zero(key));
      }
    }
    let timeout_ms = self.store_timeout_secs.saturating_mul(1_000);
    if timeout_ms <= self.store_busy_timeout_ms {
      return Err(ConfigError::BackstopTooShort {
        timeout_ms,
        busy_ms: self.store_busy_timeout_ms,
      });
    }
    Ok(())
  }

  pub fn busy_timeout(&self) -> Duration { Duration::from_millis(self.store_busy_timeout_ms) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn policy(&self) -> SubmissionPolicy {
    SubmissionPolicy { store_timeout: Duration::from_secs(self.store_timeout_secs) }
  }

  pub fn notifier_config(&self) -> NotifierConfig {
    NotifierConfig {
      owner_address:       self.email.owner_address.clone(),
      owner_name:          self.email.owner_name.clone(),
      acknowledgment_from: self.email.acknowledgment_from.clone(),
      alert_from:          self.email.alert_from.clone(),
      send_timeout:        Duration::from_secs(self.email.timeout_secs),
    }
  }

  pub fn resend_config(&self) -> ResendConfig {
    ResendConfig {
      api_key:  self.email.api_key.clone(),
      base_url: self.email.base_url.clone(),
      timeout:  Duration::from_secs(self.email.timeout_secs),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: the API nested under `/api`, CORS for browser
/// form posts, and per-request tracing.
pub fn app<S, E>(intake: Arc<Intake<S, E>>) -> Router
where
  S: MessageStore + 'static,
  E: EmailClient + 'static,
{
  Router::new()
    .nest("/api", api_router(intake))
    .layer(cors())
    .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
  CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([
      header::AUTHORIZATION,
      HeaderName::from_static("x-client-info"),
      HeaderName::from_static("apikey"),
      header::CONTENT_TYPE,
    ])
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use intake_core::email::{Delivery, OutgoingEmail};
  use intake_notify::Notifier;
  use intake_store_sqlite::SqliteStore;
  use secrecy::ExposeSecret as _;
  use serde_json::Value;
  use tower::ServiceExt as _;

  use super::*;

  const CONFIG: &str = r#"
store_path = "~/intake/contacts.db"

[email]
api_key             = "re_secret"
owner_address       = "owner@example.com"
owner_name          = "Sam Owner"
acknowledgment_from = "Sam Owner <noreply@example.com>"
alert_from          = "Portfolio Contact <noreply@example.com>"
"#;

  fn load(overrides: &[(&str, &str)]) -> ServerConfig {
    let mut builder = config::Config::builder()
      .add_source(config::File::from_str(CONFIG, config::FileFormat::Toml));
    for (key, value) in overrides {
      builder = builder.set_override(*key, *value).unwrap();
    }
    builder.build().unwrap().try_deserialize().unwrap()
  }

  #[derive(Debug, thiserror::Error)]
  #[error("unreachable")]
  struct Never;

  #[derive(Default)]
  struct Outbox(Mutex<Vec<OutgoingEmail>>);

  impl EmailClient for Outbox {
    type Error = Never;

    async fn send(&self, email: OutgoingEmail) -> Result<Delivery, Never> {
      self.0.lock().unwrap().push(email);
      Ok(Delivery::default())
    }
  }

  async fn make_app() -> (Router, Arc<Intake<SqliteStore, Outbox>>) {
    let cfg = load(&[]);
    let store = SqliteStore::open_in_memory().await.unwrap();
    let notifier = Notifier::new(Outbox::default(), cfg.notifier_config());
    let intake = Arc::new(Intake::new(Arc::new(store), Arc::new(notifier), cfg.policy()));
    (app(intake.clone()), intake)
  }

  // ── Configuration ─────────────────────────────────────────────────────────

  #[test]
  fn config_defaults_apply() {
    let cfg = load(&[]);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.policy().store_timeout, Duration::from_secs(5));
    assert_eq!(cfg.email.base_url, "https://api.resend.com");
    assert_eq!(cfg.notifier_config().send_timeout, Duration::from_secs(10));
    assert_eq!(cfg.resend_config().api_key.expose_secret(), "re_secret");
  }

  #[test]
  fn config_overrides_nested_keys() {
    let cfg = load(&[("port", "9000"), ("email.timeout_secs", "3")]);
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.resend_config().timeout, Duration::from_secs(3));
  }

  #[test]
  fn default_config_is_valid() {
    let cfg = load(&[]);
    assert_eq!(cfg.validate(), Ok(()));
    assert_eq!(cfg.busy_timeout(), Duration::from_secs(2));
  }

  #[test]
  fn zero_timeouts_are_rejected() {
    for key in ["store_timeout_secs", "store_busy_timeout_ms", "email.timeout_secs"] {
      let cfg = load(&[(key, "0")]);
      assert_eq!(cfg.validate(), Err(ConfigError::Zero(key)), "{key}");
    }
  }

  #[test]
  fn store_backstop_must_exceed_busy_timeout() {
    let cfg = load(&[("store_timeout_secs", "2"), ("store_busy_timeout_ms", "2000")]);
    assert_eq!(cfg.validate(), Err(ConfigError::BackstopTooShort {
      timeout_ms: 2_000,
      busy_ms:    2_000,
    }));

    let cfg = load(&[("store_timeout_secs", "3"), ("store_busy_timeout_ms", "2000")]);
    assert_eq!(cfg.validate(), Ok(()));
  }

  #[test]
  fn config_debug_hides_api_key() {
    assert!(!format!("{:?}", load(&[])).contains("re_secret"));
  }

  // ── HTTP ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_is_served_under_api() {
    let (app, _) = make_app().await;
    let req = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn cors_preflight_allows_form_posts() {
    let (app, _) = make_app().await;
    let req = Request::builder()
      .method("OPTIONS")
      .uri("/api/contact")
      .header(header::ORIGIN, "https://portfolio.example")
      .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
      .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,apikey")
      .body(Body::empty())
      .unwrap();

    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap();
    assert!(allowed.contains("x-client-info"), "{allowed}");
    assert!(allowed.contains("content-type"), "{allowed}");
  }

  #[tokio::test]
  async fn contact_submission_is_stored_and_notified() {
    let (app, intake) = make_app().await;
    let req = Request::builder()
      .method("POST")
      .uri("/api/contact")
      .header(header::ORIGIN, "https://portfolio.example")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(
        r#"{"name":"Ana","email":"ana@x.com","topic":"Hiring","message":"Hi"}"#,
      ))
      .unwrap();

    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["id"], 1);

    assert_eq!(intake.store().count().await.unwrap(), 1);
    let sent = intake.notifier().client().0.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().any(|e| e.to == ["owner@example.com"]));
  }
}
