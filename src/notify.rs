use anyhow::{Context, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::SmtpConfig;
use crate::models::NotificationEvent;

/// Delivers notification events over authenticated SMTPS (implicit TLS,
/// port 465).
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    /// Bad addresses and an unresolvable relay are configuration errors, so
    /// they surface here at startup rather than on the first rising edge.
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .with_context(|| format!("Failed to configure SMTP relay {}", config.host))?
            .credentials(Credentials::new(config.user.clone(), config.password.clone()))
            .build();

        Ok(Self {
            transport,
            from: config
                .user
                .parse()
                .with_context(|| format!("Invalid sender address {:?}", config.user))?,
            to: config
                .recipient
                .parse()
                .with_context(|| format!("Invalid recipient address {:?}", config.recipient))?,
        })
    }

    /// One delivery attempt, no retry. Failures are logged and reported as
    /// false; the next chance to notify is the next rising edge.
    pub async fn notify(&self, event: &NotificationEvent) -> bool {
        let message = match self.build(event) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to assemble notification email: {:#}", e);
                return false;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => {
                info!("Notification email sent to {}", self.to);
                true
            }
            Err(e) => {
                error!("Failed to send notification email: {}", e);
                false
            }
        }
    }

    fn build(&self, event: &NotificationEvent) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(event.subject.clone())
            .body(event.body.clone())
            .context("Could not build notification message")
    }
}
