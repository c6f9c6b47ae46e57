// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Twilio message source for the Butler garage daemon.
//!
//! This crate implements [`MessageSource`] over the Twilio REST API: it lists
//! the day's messages for polling and sends replies and owner alerts.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use butler_config::model::TwilioConfig;
use butler_core::{
    AdapterType, ButlerError, HealthStatus, InboundSms, MessageSid, MessageSource, OutboundSms,
    PhoneNumber, PluginAdapter,
};
use chrono::NaiveDate;
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::TwilioClient;

/// Twilio-backed [`MessageSource`].
pub struct TwilioSource {
    client: TwilioClient,
    from_number: PhoneNumber,
}

impl TwilioSource {
    /// Creates a source from the `[twilio]` section.
    ///
    /// Fails if any credential is missing.
    pub fn new(config: &TwilioConfig) -> Result<Self, ButlerError> {
        let account_sid = required(&config.account_sid, "twilio.account_sid")?;
        let auth_token = required(&config.auth_token, "twilio.auth_token")?;
        let from_number = required(&config.from_number, "twilio.from_number")?;

        let client = TwilioClient::new(
            &config.api_base_url,
            account_sid,
            SecretString::from(auth_token),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        info!(from = %from_number, "Twilio message source initialized");
        Ok(Self {
            client,
            from_number: PhoneNumber::new(&from_number),
        })
    }

    /// The number outbound messages are sent from.
    pub fn from_number(&self) -> &PhoneNumber {
        &self.from_number
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String, ButlerError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ButlerError::Config(format!("{key} is required")))
}

#[async_trait]
impl PluginAdapter for TwilioSource {
    fn name(&self) -> &str {
        "twilio"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MessageSource
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        match self.client.fetch_account().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        Ok(())
    }
}

#[async_trait]
impl MessageSource for TwilioSource {
    async fn list_messages(&self, sent_on: NaiveDate) -> Result<Vec<InboundSms>, ButlerError> {
        let messages = self.client.list_messages(sent_on).await?;
        debug!(day = %sent_on, count = messages.len(), "listed messages");
        Ok(messages.into_iter().map(|m| m.into_inbound()).collect())
    }

    async fn send_message(&self, msg: OutboundSms) -> Result<MessageSid, ButlerError> {
        let sent = self
            .client
            .send_message(msg.to.as_str(), msg.from.as_str(), &msg.body)
            .await?;
        debug!(sid = %sent.sid, to = %msg.to, "message sent");
        Ok(MessageSid(sent.sid))
    }
}
