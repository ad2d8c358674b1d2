//! The `MessageStore` trait: the persistence collaborator of the intake
//! pipeline.
//!
//! Implemented by storage backends (e.g. `intake-store-sqlite`). The
//! orchestrator depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  error::StorageError,
  message::{StoredMessage, ValidatedMessage},
};

/// Durable, insert-only storage for contact messages.
///
/// Implementations insert exactly one row per call and never retry. The
/// store, not the caller, assigns the message id and submission timestamp.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MessageStore: Send + Sync {
  type Error: std::error::Error + Into<StorageError> + Send + Sync + 'static;

  /// Persist `message` and return it with its assigned identity.
  fn store(
    &self,
    message: ValidatedMessage,
  ) -> impl Future<Output = Result<StoredMessage, Self::Error>> + Send + '_;
}
