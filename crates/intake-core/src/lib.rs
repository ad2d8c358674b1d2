//! Core types and trait definitions for the contact intake service.
//!
//! Holds the message model, form validation, and the two collaborator
//! traits ([`store::MessageStore`], [`email::EmailClient`]). No HTTP or
//! database code lives here.

pub mod email;
pub mod error;
pub mod message;
pub mod store;
pub mod validate;

pub use error::{FieldError, FieldErrors, StorageError};
pub use validate::validate;
