// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification traits: sender replies, owner alerts, and the mail transport.

use async_trait::async_trait;

use crate::error::ButlerError;
use crate::traits::adapter::PluginAdapter;
use crate::types::PhoneNumber;

/// Outbound notification surface used by the dispatcher and poll loop.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Alerts the homeowner on every configured contact.
    async fn notify_owner(&self, subject: &str, body: &str) -> Result<(), ButlerError>;

    /// Replies to the sender of a command.
    async fn reply_to_sender(&self, to: &PhoneNumber, body: &str) -> Result<(), ButlerError>;
}

/// Outbound email transport for owner alerts.
#[async_trait]
pub trait MailTransport: PluginAdapter {
    /// Sends a plain-text email to every recipient.
    async fn send_mail(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), ButlerError>;
}
