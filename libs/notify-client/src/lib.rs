//! Notification delivery for ClassConnect services
//!
//! Two delivery paths: broker fan-out on the `notifications` exchange for
//! in-app/email/push consumers ([`NotificationPublisher`]), and a direct
//! HTTP hand-off of verification PINs to the notifications service
//! ([`HttpMailSender`]).

mod mail;

pub use mail::{HttpMailSender, MailConfig, MailError, MailSender};

use broker_client::{BrokerError, Client};
use event_schema::{CodecError, Notification};
use thiserror::Error;

pub const NOTIFICATIONS_EXCHANGE: &str = "notifications";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Broker(#[from] BrokerError),
}

/// Publishes notifications to the `notifications` exchange.
///
/// The payload body carries only the notification fields; the kind travels
/// in the `type` header and the target user in the `user` header. The
/// sending service's name is stamped on by the broker client itself.
#[derive(Clone)]
pub struct NotificationPublisher {
    client: Client,
}

impl NotificationPublisher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn send(
        &self,
        user_id: &str,
        notification: &Notification,
    ) -> Result<(), NotifyError> {
        let body = notification.encode()?;
        self.client
            .publish(
                NOTIFICATIONS_EXCHANGE,
                [
                    ("type".to_string(), notification.discriminator().to_string()),
                    ("user".to_string(), user_id.to_string()),
                ],
                &body,
            )
            .await?;
        tracing::debug!(
            kind = notification.discriminator(),
            user = user_id,
            "notification published"
        );
        Ok(())
    }
}
