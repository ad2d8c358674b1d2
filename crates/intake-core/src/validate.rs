//! Field validation for incoming contact forms.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::{
  error::{FieldError, FieldErrors},
  message::{ContactForm, ValidatedMessage},
};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Check every field of `form` and return the normalised message, or all of
/// the field errors at once.
///
/// - `name` and `message` are trimmed and must be non-empty.
/// - `email` is checked as sent: blank is [`FieldError::MissingField`],
///   otherwise the raw value must look like `local@domain.tld` or it is
///   [`FieldError::InvalidFormat`]. Surrounding whitespace is not tolerated.
/// - `topic` is optional and unconstrained; a blank topic is dropped.
/// - extension values are flattened to strings; `null` entries are dropped.
///
/// Pure: the same input always yields the same result.
pub fn validate(form: &ContactForm) -> Result<ValidatedMessage, FieldErrors> {
  let mut errors = FieldErrors::new();

  let name = form.name.trim();
  if name.is_empty() {
    errors.insert("name", FieldError::MissingField);
  }

  let email = form.email.as_str();
  if email.trim().is_empty() {
    errors.insert("email", FieldError::MissingField);
  } else if !EMAIL_PATTERN.is_match(email) {
    errors.insert("email", FieldError::InvalidFormat);
  }

  let message = form.message.trim();
  if message.is_empty() {
    errors.insert("message", FieldError::MissingField);
  }

  if !errors.is_empty() {
    return Err(errors);
  }

  let topic = form
    .topic
    .as_deref()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned);

  Ok(ValidatedMessage {
    name: name.to_owned(),
    email: email.to_owned(),
    topic,
    message: message.to_owned(),
    extensions: flatten_extensions(&form.extensions),
  })
}

fn flatten_extensions(raw: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
  raw
    .iter()
    .filter_map(|(key, value)| {
      let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
      };
      Some((key.clone(), text))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(name: &str, email: &str, message: &str) -> ContactForm {
    ContactForm::new(name, email, message)
  }

  #[test]
  fn accepts_minimal_valid_form() {
    let v = validate(&form("Ana", "ana@x.com", "Hi")).unwrap();
    assert_eq!(v.name(), "Ana");
    assert_eq!(v.email(), "ana@x.com");
    assert_eq!(v.message(), "Hi");
    assert_eq!(v.topic(), None);
  }

  #[test]
  fn trims_name_and_message() {
    let v = validate(&form("  Ana \n", "ana@x.com", "\tHello there  ")).unwrap();
    assert_eq!(v.name(), "Ana");
    assert_eq!(v.email(), "ana@x.com");
    assert_eq!(v.message(), "Hello there");
  }

  #[test]
  fn email_with_surrounding_whitespace_is_invalid() {
    for email in [" ana@x.com ", "ana@x.com\n", "\tana@x.com"] {
      let errors = validate(&form("Ana", email, "Hi")).unwrap_err();
      assert_eq!(errors.get("email"), Some(FieldError::InvalidFormat), "email {email:?}");
      assert_eq!(errors.len(), 1);
    }
  }

  #[test]
  fn blank_names_are_missing() {
    for name in ["", " ", "   ", "\t\n", "\u{3000}"] {
      let errors = validate(&form(name, "ana@x.com", "Hi")).unwrap_err();
      assert_eq!(errors.get("name"), Some(FieldError::MissingField), "name {name:?}");
      assert_eq!(errors.len(), 1, "only name should fail for {name:?}");
    }
  }

  #[test]
  fn blank_message_is_missing() {
    let errors = validate(&form("Ana", "ana@x.com", "  ")).unwrap_err();
    assert_eq!(errors.get("message"), Some(FieldError::MissingField));
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn empty_email_is_missing_not_invalid() {
    let errors = validate(&form("Ana", "  ", "Hi")).unwrap_err();
    assert_eq!(errors.get("email"), Some(FieldError::MissingField));
  }

  #[test]
  fn malformed_emails_are_invalid() {
    for email in [
      "bad",
      "ana.x.com",
      "ana@x",
      "ana@localhost",
      "@x.com",
      "ana@.com",
      "ana@x.",
      "an a@x.com",
      "ana@@x.com",
      "ana@x .com",
    ] {
      let errors = validate(&form("Ana", email, "Hi")).unwrap_err();
      assert_eq!(
        errors.get("email"),
        Some(FieldError::InvalidFormat),
        "email {email:?}"
      );
    }
  }

  #[test]
  fn plausible_emails_are_accepted() {
    for email in ["a@b.c", "first.last+tag@sub.example.org", "x@y.co.uk"] {
      assert!(validate(&form("Ana", email, "Hi")).is_ok(), "email {email:?}");
    }
  }

  #[test]
  fn reports_every_failing_field() {
    let errors = validate(&form("", "bad", "")).unwrap_err();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get("name"), Some(FieldError::MissingField));
    assert_eq!(errors.get("email"), Some(FieldError::InvalidFormat));
    assert_eq!(errors.get("message"), Some(FieldError::MissingField));
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["email", "message", "name"]);
  }

  #[test]
  fn validation_is_idempotent() {
    let good = form("Ana", "ana@x.com", "Hi").with_topic("Work");
    assert_eq!(validate(&good), validate(&good));

    let bad = form(" ", "nope", "");
    assert_eq!(validate(&bad), validate(&bad));
  }

  #[test]
  fn blank_topic_is_dropped_and_topic_is_trimmed() {
    let v = validate(&form("Ana", "ana@x.com", "Hi").with_topic("   ")).unwrap();
    assert_eq!(v.topic(), None);

    let v = validate(&form("Ana", "ana@x.com", "Hi").with_topic(" Hiring ")).unwrap();
    assert_eq!(v.topic(), Some("Hiring"));
  }

  #[test]
  fn string_extensions_pass_through_unchanged() {
    let f = form("Ana", "ana@x.com", "Hi")
      .with_extension("company", "Acme")
      .with_extension("timeline", "asap");
    let v = validate(&f).unwrap();
    assert_eq!(v.extensions().len(), 2);
    assert_eq!(v.extensions()["company"], "Acme");
    assert_eq!(v.extensions()["timeline"], "asap");
  }

  #[test]
  fn non_string_extensions_are_flattened() {
    let mut f = form("Ana", "ana@x.com", "Hi");
    f.extensions.insert("company".into(), Value::Null);
    f.extensions.insert("budget".into(), serde_json::json!(5000));
    f.extensions.insert("remote".into(), serde_json::json!(true));
    f.extensions.insert("tags".into(), serde_json::json!(["a", "b"]));

    let v = validate(&f).unwrap();
    assert!(!v.extensions().contains_key("company"));
    assert_eq!(v.extensions()["budget"], "5000");
    assert_eq!(v.extensions()["remote"], "true");
    assert_eq!(v.extensions()["tags"], r#"["a","b"]"#);
  }

  #[test]
  fn field_errors_serialise_as_flat_object() {
    let errors = validate(&form("", "bad", "ok")).unwrap_err();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "email": "invalid_format", "name": "missing_field" })
    );
  }
}
