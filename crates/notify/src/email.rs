//! SMTP email notifier via `lettre`.
//!
//! Delivers notifications as plain-text emails through an SMTP relay,
//! using the default transport (no TLS, standard SMTP port) expected of
//! an in-cluster mail server.

use crate::traits::{Notification, Notifier, NotifyError};
use lettre::{
    message::Mailbox, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Sends notifications as emails via SMTP.
#[derive(Debug)]
pub struct EmailNotifier {
    /// Async SMTP transport for sending emails.
    transport: AsyncSmtpTransport<Tokio1Executor>,
    /// Sender mailbox.
    from: Mailbox,
    /// Recipient mailboxes.
    to: Vec<Mailbox>,
}

impl EmailNotifier {
    /// Build an `EmailNotifier` from resolved configuration.
    ///
    /// - `rcpt`: comma-separated recipient addresses; must contain at
    ///   least one entry.
    /// - `mail_server`: SMTP relay hostname, connected over the default
    ///   transport (plain SMTP).
    /// - `sender`: sender address for the `From` header.
    pub fn from_config(rcpt: &str, mail_server: &str, sender: &str) -> Result<Self, NotifyError> {
        let to_mailboxes: Vec<Mailbox> = rcpt
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .map(|addr| {
                addr.parse()
                    .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if to_mailboxes.is_empty() {
            return Err(NotifyError::MissingField(
                "rcpt: set --rcpt or `rcpt` in [inputdir]/.notification.yaml".to_string(),
            ));
        }

        let from_mailbox: Mailbox = sender
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Config(e.to_string()))?;

        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(mail_server).build();

        Ok(Self {
            transport,
            from: from_mailbox,
            to: to_mailboxes,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    /// Send the notification as an email to all configured recipients.
    ///
    /// The title becomes the subject (empty when absent) and the content
    /// the plain-text body.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut message_builder = Message::builder().from(self.from.clone());

        for recipient in &self.to {
            message_builder = message_builder.to(recipient.clone());
        }

        let subject = notification.title.as_deref().unwrap_or_default();

        let email = message_builder
            .subject(subject)
            .body(notification.content.clone())
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        tracing::info!(
            channel = "email",
            subject = %subject,
            recipients = self.to.len(),
            "notification delivered"
        );

        Ok(())
    }

    /// Returns `"email"`.
    fn channel_name(&self) -> &str {
        "email"
    }
}
