//! Outbound email: the sender contract, an SMTP implementation, and
//! the fire-and-forget notification dispatcher

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use common::User;

use crate::config::MailConfig;

const CONFIRMATION_SUBJECT: &str = "You just registered on quadro";

/// Email sending error. Never part of a registration's success or
/// failure contract.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("failed to send email: {0}")]
    SendFailed(String),

    #[error("invalid mail configuration: {0}")]
    InvalidConfig(String),
}

/// Outbound email sender contract.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), MailError>;

    /// Optional pre-send address verification. The default accepts
    /// every address; providers with a validation API can override.
    async fn validate_address(&self, _address: &str) -> Result<bool, MailError> {
        Ok(true)
    }
}

/// SMTP-backed mailer.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer. `from` is the notification address
    /// stamped on every outbound message.
    pub fn new(config: &MailConfig, from: &str) -> Result<Self, MailError> {
        let mut builder = if config.use_tls {
            let tls_params = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| MailError::InvalidConfig(format!("TLS configuration error: {e}")))?;

            // Port 465 uses implicit TLS (SMTPS), other ports use STARTTLS
            if config.smtp_port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                    .map_err(|e| MailError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.smtp_port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| MailError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.smtp_port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
        };

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| MailError::InvalidConfig(format!("invalid from address: {e}")))?,
            )
            .to(recipient
                .parse()
                .map_err(|e| MailError::SendFailed(format!("invalid recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

#[derive(Debug)]
enum Notification {
    Confirmation {
        username: String,
        email: String,
        code: String,
    },
}

/// Fire-and-forget notification queue.
///
/// Messages are drained by a background worker task; delivery failures
/// are logged by the worker and never surface to the operation that
/// queued them.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<Notification>,
}

impl NotificationDispatcher {
    /// Spawn the delivery worker. Must be called inside a tokio
    /// runtime.
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                let Notification::Confirmation {
                    username,
                    email,
                    code,
                } = notification;
                let body = format!(
                    "Hi, {username}! You've just signed up to quadro.\n\
                     Please click here to confirm your email address: {code}"
                );
                match mailer.send(CONFIRMATION_SUBJECT, &body, &email).await {
                    Ok(()) => info!(recipient = %email, "confirmation email sent"),
                    Err(err) => warn!(%err, recipient = %email, "confirmation email failed"),
                }
            }
        });
        Self { tx }
    }

    /// Queue the registration confirmation email. Never blocks and
    /// never fails the caller.
    pub fn dispatch_confirmation(&self, user: &User) {
        let queued = self.tx.send(Notification::Confirmation {
            username: user.username.clone(),
            email: user.email.clone(),
            code: user.confirm_code.clone(),
        });
        if queued.is_err() {
            warn!(username = %user.username, "notification worker gone, dropping confirmation email");
        }
    }
}
