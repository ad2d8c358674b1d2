//! JSON API for the contact intake service.
//!
//! Exposes an axum [`Router`] backed by an [`Intake`] orchestrator, itself
//! generic over any [`MessageStore`] and [`EmailClient`]. CORS, tracing and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", intake_api::api_router(intake.clone()))
//! ```

pub mod contact;
pub mod error;
pub mod submission;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use intake_core::{email::EmailClient, store::MessageStore};

pub use error::ApiError;
pub use submission::{Intake, Outcome, Receipt, Stage, SubmissionError, SubmissionPolicy};

/// Build the API router for `intake`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, E>(intake: Arc<Intake<S, E>>) -> Router<()>
where
  S: MessageStore + 'static,
  E: EmailClient + 'static,
{
  Router::new()
    .route("/contact", post(contact::submit::<S, E>))
    .route("/health", get(contact::health))
    .with_state(intake)
}
