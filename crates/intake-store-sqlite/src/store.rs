//! [`SqliteStore`]: the SQLite implementation of [`MessageStore`].

use std::{collections::BTreeMap, path::Path, time::Duration};

use chrono::{DateTime, Utc};
use intake_core::{
  message::{MessageId, StoredMessage, ValidatedMessage},
  store::MessageStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{decode_dt, decode_extensions, encode_dt, encode_extensions},
  schema::SCHEMA,
};

// ─── Read model ──────────────────────────────────────────────────────────────

/// A `contacts` row exactly as stored. Only used for operational reads; the
/// intake path never reads back what it wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
  pub id:           MessageId,
  pub name:         String,
  pub email:        String,
  pub topic:        Option<String>,
  pub message:      String,
  pub extensions:   BTreeMap<String, String>,
  pub submitted_at: DateTime<Utc>,
}

struct RawContact {
  id:           i64,
  name:         String,
  email:        String,
  topic:        Option<String>,
  message:      String,
  extensions:   String,
  submitted_at: String,
}

impl RawContact {
  fn into_record(self) -> Result<ContactRecord> {
    Ok(ContactRecord {
      id:           MessageId::new(self.id),
      name:         self.name,
      email:        self.email,
      topic:        self.topic,
      message:      self.message,
      extensions:   decode_extensions(&self.extensions)?,
      submitted_at: decode_dt(&self.submitted_at)?,
    })
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact message store backed by a single SQLite file.
///
/// Cloning shares the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// How long a write waits on another connection's lock before giving up
/// with `SQLITE_BUSY`.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(2);

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_busy_timeout(path, DEFAULT_BUSY_TIMEOUT).await
  }

  /// Like [`SqliteStore::open`], with an explicit lock wait.
  ///
  /// A write that cannot take the lock within `busy_timeout` fails with
  /// nothing committed. Callers that bound the store call from outside must
  /// allow more than this.
  pub async fn open_with_busy_timeout(
    path: impl AsRef<Path>,
    busy_timeout: Duration,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(busy_timeout).await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(DEFAULT_BUSY_TIMEOUT).await?;
    Ok(store)
  }

  async fn init_schema(&self, busy_timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("contact store schema ready");
    Ok(())
  }

  /// Number of stored messages.
  pub async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }

  /// Fetch a stored message by id. Returns `None` if not found.
  pub async fn get(&self, id: MessageId) -> Result<Option<ContactRecord>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, email, topic, message, extensions, submitted_at
               FROM contacts WHERE id = ?1",
              rusqlite::params![id.get()],
              |row| {
                Ok(RawContact {
                  id:           row.get(0)?,
                  name:         row.get(1)?,
                  email:        row.get(2)?,
                  topic:        row.get(3)?,
                  message:      row.get(4)?,
                  extensions:   row.get(5)?,
                  submitted_at: row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_record).transpose()
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── MessageStore impl ───────────────────────────────────────────────────────

impl MessageStore for SqliteStore {
  type Error = crate::Error;

  async fn store(&self, message: ValidatedMessage) -> Result<StoredMessage> {
    let submitted_at = Utc::now();

    let name_str       = message.name().to_owned();
    let email_str      = message.email().to_owned();
    let topic_str      = message.topic().map(str::to_owned);
    let message_str    = message.message().to_owned();
    let extensions_str = encode_extensions(message.extensions())?;
    let at_str         = encode_dt(submitted_at);

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (name, email, topic, message, extensions, submitted_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            name_str,
            email_str,
            topic_str,
            message_str,
            extensions_str,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "stored contact message");
    Ok(StoredMessage::new(MessageId::new(id), submitted_at, message))
  }
}
