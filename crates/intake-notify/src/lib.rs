//! Best-effort notification emails for stored contact messages.
//!
//! [`Notifier`] renders two emails per message, an acknowledgment to the
//! visitor and an alert to the site owner, and hands them to any
//! [`intake_core::email::EmailClient`]. [`resend::ResendClient`] is the
//! production client.

pub mod error;
pub mod notifier;
pub mod resend;
pub mod templates;

pub use error::{EmailKind, NotificationError, SendError, SendFailure};
pub use notifier::{Notifier, NotifierConfig, Sent};
