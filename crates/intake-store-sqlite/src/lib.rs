//! SQLite backend for contact message storage.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{ContactRecord, DEFAULT_BUSY_TIMEOUT, SqliteStore};
