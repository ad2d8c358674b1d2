//! Encoding helpers between domain types and the plain-text representations
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; extension fields as a compact
//! JSON object.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_extensions(ext: &BTreeMap<String, String>) -> Result<String> {
  Ok(serde_json::to_string(ext)?)
}

pub fn decode_extensions(s: &str) -> Result<BTreeMap<String, String>> {
  Ok(serde_json::from_str(s)?)
}
