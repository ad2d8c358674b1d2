//! Contact messages, the only domain entity of the intake service.
//!
//! A message moves through three shapes: the raw [`ContactForm`] as sent by a
//! visitor, the [`ValidatedMessage`] produced by [`crate::validate`], and the
//! [`StoredMessage`] returned once the store has assigned an id and a
//! submission timestamp. Stored messages are never updated or deleted.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─── Raw input ───────────────────────────────────────────────────────────────

/// A contact-form submission exactly as received.
///
/// Missing required fields deserialise as empty strings so the validator can
/// report them alongside any other field errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
  #[serde(default)]
  pub name:       String,
  #[serde(default)]
  pub email:      String,
  #[serde(default)]
  pub topic:      Option<String>,
  #[serde(default)]
  pub message:    String,
  /// Additional fields sent by richer form variants, e.g. `company`,
  /// `budget` or `timeline`. Any JSON value is accepted here; validation
  /// flattens them to strings.
  #[serde(flatten)]
  pub extensions: BTreeMap<String, Value>,
}

impl ContactForm {
  /// Convenience constructor for the minimal form with no topic.
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    message: impl Into<String>,
  ) -> Self {
    Self {
      name: name.into(),
      email: email.into(),
      message: message.into(),
      ..Self::default()
    }
  }

  pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
    self.topic = Some(topic.into());
    self
  }

  pub fn with_extension(
    mut self,
    key: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    self.extensions.insert(key.into(), Value::String(value.into()));
    self
  }
}

// ─── Validated ───────────────────────────────────────────────────────────────

/// A submission whose fields have passed every check, normalised (trimmed)
/// and not yet stored.
///
/// Only [`crate::validate`] can build one, so holding a value of this type is
/// proof that validation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedMessage {
  pub(crate) name:       String,
  pub(crate) email:      String,
  pub(crate) topic:      Option<String>,
  pub(crate) message:    String,
  pub(crate) extensions: BTreeMap<String, String>,
}

impl ValidatedMessage {
  pub fn name(&self) -> &str { &self.name }

  pub fn email(&self) -> &str { &self.email }

  pub fn topic(&self) -> Option<&str> { self.topic.as_deref() }

  pub fn message(&self) -> &str { &self.message }

  pub fn extensions(&self) -> &BTreeMap<String, String> { &self.extensions }
}

// ─── Stored ──────────────────────────────────────────────────────────────────

/// Opaque identifier assigned by the store.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
  pub fn new(raw: i64) -> Self { Self(raw) }

  pub fn get(self) -> i64 { self.0 }
}

impl fmt::Display for MessageId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A validated message plus its store-assigned identity. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredMessage {
  pub id:           MessageId,
  /// Set by the store at write time.
  pub submitted_at: DateTime<Utc>,
  #[serde(flatten)]
  pub content:      ValidatedMessage,
}

impl StoredMessage {
  pub fn new(
    id: MessageId,
    submitted_at: DateTime<Utc>,
    content: ValidatedMessage,
  ) -> Self {
    Self { id, submitted_at, content }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_fields_deserialise_as_empty() {
    let form: ContactForm = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
    assert_eq!(form.name, "");
    assert_eq!(form.message, "");
    assert_eq!(form.topic, None);
    assert!(form.extensions.is_empty());
  }

  #[test]
  fn unknown_string_fields_become_extensions() {
    let form: ContactForm = serde_json::from_str(
      r#"{"name":"Ana","email":"ana@x.com","message":"Hi","company":"Acme","budget":"5k-15k"}"#,
    )
    .unwrap();
    assert_eq!(form.extensions.len(), 2);
    assert_eq!(form.extensions["company"], "Acme");
    assert_eq!(form.extensions["budget"], "5k-15k");
  }

  #[test]
  fn extensions_of_any_json_type_are_accepted() {
    let form: ContactForm = serde_json::from_str(
      r#"{"name":"Ana","email":"ana@x.com","message":"Hi","company":null,"budget":5000}"#,
    )
    .unwrap();
    assert_eq!(form.extensions["company"], Value::Null);
    assert_eq!(form.extensions["budget"], 5000);
  }

  #[test]
  fn null_topic_is_none() {
    let form: ContactForm = serde_json::from_str(
      r#"{"name":"Ana","email":"ana@x.com","topic":null,"message":"Hi"}"#,
    )
    .unwrap();
    assert_eq!(form.topic, None);
    assert!(form.extensions.is_empty());
  }
}
