// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message source trait for the polled SMS provider.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ButlerError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundSms, MessageSid, OutboundSms};

/// An append-only, externally hosted log of SMS messages.
///
/// The log is delivered at-least-once and entries are never deleted, so the
/// same message is returned by every poll for the rest of its day.
#[async_trait]
pub trait MessageSource: PluginAdapter {
    /// Lists every message sent on the given (provider clock) day, in the
    /// provider's delivery order.
    async fn list_messages(&self, sent_on: NaiveDate) -> Result<Vec<InboundSms>, ButlerError>;

    /// Sends an SMS and returns the provider-assigned identifier.
    async fn send_message(&self, msg: OutboundSms) -> Result<MessageSid, ButlerError>;
}
