//! Handlers for the contact endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/contact` | Body: [`ContactForm`]; `201` once stored |
//! | `GET`  | `/health`  | Liveness check |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
};
use chrono::{DateTime, Utc};
use intake_core::{
  email::EmailClient,
  message::{ContactForm, MessageId},
  store::MessageStore,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::{error::ApiError, submission::Intake};

pub const ACCEPTED_MESSAGE: &str = "Thank you for reaching out. You will get a reply soon!";

/// Success payload of `POST /contact`.
#[derive(Debug, Serialize)]
pub struct Accepted {
  pub success:      bool,
  pub id:           MessageId,
  pub submitted_at: DateTime<Utc>,
  pub message:      &'static str,
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// `POST /contact`, body: `{"name","email","topic"?,"message", ...}`
pub async fn submit<S, E>(
  State(intake): State<Arc<Intake<S, E>>>,
  body: Result<Json<ContactForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Accepted>), ApiError>
where
  S: MessageStore,
  E: EmailClient,
{
  let Json(form) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let outcome = intake.submit(form).await;
  let receipt = outcome.result?;

  Ok((
    StatusCode::CREATED,
    Json(Accepted {
      success:      true,
      id:           receipt.message.id,
      submitted_at: receipt.message.submitted_at,
      message:      ACCEPTED_MESSAGE,
    }),
  ))
}

// ─── Health ───────────────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
