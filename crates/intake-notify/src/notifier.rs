//! [`Notifier`] sends the acknowledgment and owner alert for a stored
//! message.

use std::time::Duration;

use intake_core::{
  email::{Delivery, EmailClient, OutgoingEmail},
  message::StoredMessage,
};

use crate::{
  error::{EmailKind, NotificationError, SendError, SendFailure},
  templates,
};

/// Addresses and limits used when rendering and sending notifications.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
  /// Fixed recipient of every owner alert.
  pub owner_address:       String,
  /// Used to sign the acknowledgment.
  pub owner_name:          String,
  pub acknowledgment_from: String,
  pub alert_from:          String,
  /// Upper bound for each individual send.
  pub send_timeout:        Duration,
}

/// Provider receipts for a fully successful notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
  pub acknowledgment: Delivery,
  pub owner_alert:    Delivery,
}

/// Renders and dispatches the two notification emails for a message.
pub struct Notifier<E> {
  client: E,
  config: NotifierConfig,
}

impl<E: EmailClient> Notifier<E> {
  pub fn new(client: E, config: NotifierConfig) -> Self { Self { client, config } }

  pub fn client(&self) -> &E { &self.client }

  pub fn config(&self) -> &NotifierConfig { &self.config }

  /// Send both emails for `message`.
  ///
  /// The two sends run concurrently and independently: a failure of one never
  /// prevents the other. Returns an error if either failed; the error still
  /// reports the one that got through.
  pub async fn notify(
    &self,
    message: &StoredMessage,
  ) -> Result<Sent, NotificationError> {
    let ack   = templates::acknowledgment(message, &self.config);
    let alert = templates::owner_alert(message, &self.config);

    let (ack, alert) = tokio::join!(
      self.deliver(EmailKind::Acknowledgment, ack),
      self.deliver(EmailKind::OwnerAlert, alert),
    );

    match (ack, alert) {
      (Ok(acknowledgment), Ok(owner_alert)) => Ok(Sent { acknowledgment, owner_alert }),
      (ack, alert) => {
        let mut failures  = Vec::new();
        let mut delivered = Vec::new();
        for (kind, result) in [
          (EmailKind::Acknowledgment, ack),
          (EmailKind::OwnerAlert, alert),
        ] {
          match result {
            Ok(d)      => delivered.push((kind, d)),
            Err(error) => failures.push(SendFailure { kind, error }),
          }
        }
        Err(NotificationError { failures, delivered })
      }
    }
  }

  async fn deliver(
    &self,
    kind: EmailKind,
    email: OutgoingEmail,
  ) -> Result<Delivery, SendError> {
    let limit = self.config.send_timeout;
    match tokio::time::timeout(limit, self.client.send(email)).await {
      Ok(Ok(delivery)) => {
        tracing::debug!(%kind, provider_id = ?delivery.provider_id, "email sent");
        Ok(delivery)
      }
      Ok(Err(e)) => Err(SendError::Provider(Box::new(e))),
      Err(_)     => Err(SendError::Timeout(limit)),
    }
  }
}
