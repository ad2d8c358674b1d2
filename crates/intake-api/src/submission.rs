//! The submission orchestrator.
//!
//! One submission state machine is created per request and driven through
//!
//! ```text
//! Idle → Validating → Persisting → Notifying → Succeeded
//!             │            │
//!             └────────────┴──────→ Failed
//! ```
//!
//! Only validation and storage can fail a submission. Once the message is
//! stored the submission succeeds; notification failures are logged and kept
//! in the [`Receipt`] but never reported as a failure.

use std::{sync::Arc, time::Duration};

use intake_core::{
  FieldErrors, StorageError,
  email::EmailClient,
  message::{ContactForm, StoredMessage, ValidatedMessage},
  store::MessageStore,
  validate,
};
use intake_notify::{NotificationError, Notifier, Sent};
use serde::Serialize;
use thiserror::Error;
use tracing::Instrument as _;
use uuid::Uuid;

// ─── Stages ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
  Idle,
  Validating,
  Persisting,
  Notifying,
  Succeeded,
  Failed,
}

impl Stage {
  pub fn is_terminal(self) -> bool { matches!(self, Self::Succeeded | Self::Failed) }

  /// Whether the machine may move from `self` to `next`.
  pub fn can_advance_to(self, next: Stage) -> bool {
    use Stage::*;
    matches!(
      (self, next),
      (Idle, Validating)
        | (Validating, Persisting)
        | (Validating, Failed)
        | (Persisting, Notifying)
        | (Persisting, Failed)
        | (Notifying, Succeeded)
    )
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Why a submission ended in [`Stage::Failed`].
#[derive(Debug, Error)]
pub enum SubmissionError {
  #[error("validation failed: {0}")]
  Validation(#[from] FieldErrors),

  #[error("message was not stored: {0}")]
  Storage(#[from] StorageError),
}

/// Proof that a message was durably recorded, plus how its notification went.
#[derive(Debug)]
pub struct Receipt {
  pub message:      StoredMessage,
  /// Best-effort; an error here does not affect the submission.
  pub notification: Result<Sent, NotificationError>,
}

/// The terminal result of one submission.
#[derive(Debug)]
pub struct Outcome {
  /// Correlation id, also recorded on the submission's tracing span.
  pub submission_id: Uuid,
  /// Every stage the machine passed through, starting with [`Stage::Idle`].
  pub trail:         Vec<Stage>,
  pub result:        Result<Receipt, SubmissionError>,
}

impl Outcome {
  /// The terminal stage.
  pub fn stage(&self) -> Stage { self.trail.last().copied().unwrap_or(Stage::Idle) }
}

// ─── State machine ───────────────────────────────────────────────────────────

struct Submission {
  id:    Uuid,
  stage: Stage,
  trail: Vec<Stage>,
}

impl Submission {
  fn start() -> Self {
    Self { id: Uuid::new_v4(), stage: Stage::Idle, trail: vec![Stage::Idle] }
  }

  fn advance(&mut self, next: Stage) {
    debug_assert!(
      self.stage.can_advance_to(next),
      "illegal transition {:?} → {next:?}",
      self.stage
    );
    tracing::trace!(from = ?self.stage, to = ?next, "submission stage");
    self.stage = next;
    self.trail.push(next);
  }

  fn finish(self, result: Result<Receipt, SubmissionError>) -> Outcome {
    Outcome { submission_id: self.id, trail: self.trail, result }
  }
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Limits applied by the orchestrator to its external calls.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionPolicy {
  /// Backstop for the store call. Exceeding it fails the submission with
  /// [`StorageError::Timeout`].
  ///
  /// The store bounds its own writes and answers definitively within that
  /// bound; this limit must be longer, because a write abandoned here may
  /// still commit.
  pub store_timeout: Duration,
}

impl Default for SubmissionPolicy {
  fn default() -> Self { Self { store_timeout: Duration::from_secs(5) } }
}

/// Composes validation, storage and notification for each submission.
///
/// Holds no per-request state; share it behind an [`Arc`].
pub struct Intake<S, E> {
  store:    Arc<S>,
  notifier: Arc<Notifier<E>>,
  policy:   SubmissionPolicy,
}

impl<S, E> Intake<S, E>
where
  S: MessageStore,
  E: EmailClient,
{
  pub fn new(store: Arc<S>, notifier: Arc<Notifier<E>>, policy: SubmissionPolicy) -> Self {
    Self { store, notifier, policy }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn notifier(&self) -> &Notifier<E> { &self.notifier }

  /// Run one submission to a terminal stage.
  pub async fn submit(&self, form: ContactForm) -> Outcome {
    let run = Submission::start();
    let span = tracing::info_span!("intake.submission", id = %run.id);
    self.drive(run, form).instrument(span).await
  }

  async fn drive(&self, mut run: Submission, form: ContactForm) -> Outcome {
    run.advance(Stage::Validating);
    let validated = match validate(&form) {
      Ok(v) => v,
      Err(errors) => {
        tracing::debug!(%errors, "submission rejected");
        run.advance(Stage::Failed);
        return run.finish(Err(errors.into()));
      }
    };

    run.advance(Stage::Persisting);
    let stored = match self.persist(validated).await {
      Ok(m) => m,
      Err(e) => {
        tracing::error!(error = %e, "failed to store contact message");
        run.advance(Stage::Failed);
        return run.finish(Err(e.into()));
      }
    };
    tracing::info!(message_id = %stored.id, "contact message stored");

    run.advance(Stage::Notifying);
    // Don't fail here: the message is already stored.
    let notification = self.notifier.notify(&stored).await;
    match &notification {
      Ok(_) => tracing::info!(message_id = %stored.id, "notification emails sent"),
      Err(e) => {
        for failure in &e.failures {
          tracing::warn!(
            message_id = %stored.id,
            email = %failure.kind,
            error = %failure.error,
            "notification email failed"
          );
        }
      }
    }

    run.advance(Stage::Succeeded);
    run.finish(Ok(Receipt { message: stored, notification }))
  }

  async fn persist(&self, message: ValidatedMessage) -> Result<StoredMessage, StorageError> {
    let limit = self.policy.store_timeout;
    match tokio::time::timeout(limit, self.store.store(message)).await {
      Ok(Ok(stored)) => Ok(stored),
      Ok(Err(e))     => Err(e.into()),
      Err(_)         => Err(StorageError::Timeout(limit)),
    }
  }
}
