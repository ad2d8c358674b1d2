//! Error type for `intake-store-sqlite`.

use intake_core::StorageError;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for StorageError {
  fn from(err: Error) -> Self {
    if matches!(err, Error::Database(tokio_rusqlite::Error::ConnectionClosed)) {
      return StorageError::Unavailable(Box::new(err));
    }

    let code = match &err {
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) => e.sqlite_error_code(),
      _ => None,
    };

    match code {
      Some(ErrorCode::ConstraintViolation) => {
        StorageError::Constraint(err.to_string())
      }
      Some(
        ErrorCode::CannotOpen
        | ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::DiskFull
        | ErrorCode::SystemIoFailure
        | ErrorCode::ReadOnly,
      ) => StorageError::Unavailable(Box::new(err)),
      _ => StorageError::Backend(Box::new(err)),
    }
  }
}
