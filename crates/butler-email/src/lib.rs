// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP mail transport for Butler owner alerts.
//!
//! Implements [`MailTransport`] with lettre's async SMTP client. Port 465
//! uses implicit TLS; every other port negotiates STARTTLS.

use async_trait::async_trait;
use butler_config::model::EmailConfig;
use butler_core::{AdapterType, ButlerError, HealthStatus, MailTransport, PluginAdapter};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

/// Port that speaks TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP-backed [`MailTransport`].
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

impl SmtpMailer {
    /// Builds a mailer from the `[email]` section. No connection is made.
    pub fn new(config: &EmailConfig) -> Result<Self, ButlerError> {
        let host = config
            .smtp_host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ButlerError::Config("email.smtp_host is required".into()))?;
        let from = config
            .from_address
            .as_deref()
            .ok_or_else(|| ButlerError::Config("email.from_address is required".into()))?
            .parse::<Mailbox>()
            .map_err(|e| ButlerError::Config(format!("email.from_address is invalid: {e}")))?;

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| ButlerError::Config(format!("invalid SMTP relay `{host}`: {e}")))?
        .port(config.smtp_port);

        let builder = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        info!(host, port = config.smtp_port, "SMTP mailer initialized");
        Ok(Self {
            transport: builder.build(),
            from,
            host: host.to_string(),
        })
    }
}

/// Builds a plain-text message to every recipient.
pub fn build_message(
    from: &Mailbox,
    to: &[String],
    subject: &str,
    body: &str,
) -> Result<Message, ButlerError> {
    if to.is_empty() {
        return Err(ButlerError::Notification {
            message: "no email recipients".into(),
            source: None,
        });
    }

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);
    for addr in to {
        let mailbox = addr.parse::<Mailbox>().map_err(|e| ButlerError::Notification {
            message: format!("invalid recipient `{addr}`"),
            source: Some(Box::new(e)),
        })?;
        builder = builder.to(mailbox);
    }

    builder
        .body(body.to_string())
        .map_err(|e| ButlerError::Notification {
            message: format!("failed to build email: {e}"),
            source: Some(Box::new(e)),
        })
}

#[async_trait]
impl PluginAdapter for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mail
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Degraded(format!(
                "{} accepted the connection but did not answer NOOP",
                self.host
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        Ok(())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send_mail(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), ButlerError> {
        let message = build_message(&self.from, to, subject, body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| ButlerError::Notification {
                message: format!("SMTP send via {} failed: {e}", self.host),
                source: Some(Box::new(e)),
            })?;
        debug!(recipients = to.len(), subject, "alert email sent");
        Ok(())
    }
}
