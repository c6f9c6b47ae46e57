// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message source for deterministic testing.
//!
//! `MockSource` implements `MessageSource` with scripted listing results and
//! captured outbound messages for assertion in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use butler_core::{
    AdapterType, ButlerError, DeliveryStatus, HealthStatus, InboundSms, MessageSid, MessageSource,
    OutboundSms, PhoneNumber, PluginAdapter,
};

/// Number every test message is addressed to.
pub const SERVICE_NUMBER: &str = "+12145550100";

/// A received message from `from` with the given body.
pub fn sms(sid: &str, from: &str, body: &str) -> InboundSms {
    sms_with_status(sid, from, body, DeliveryStatus::Received)
}

/// A message in an arbitrary delivery state.
pub fn sms_with_status(sid: &str, from: &str, body: &str, status: DeliveryStatus) -> InboundSms {
    InboundSms {
        sid: MessageSid(sid.to_string()),
        from: PhoneNumber::new(from),
        to: PhoneNumber::new(SERVICE_NUMBER),
        body: body.to_string(),
        status,
        sent_at: Some(Utc::now()),
    }
}

/// A mock SMS provider.
///
/// - **listings**: each `list_messages()` call pops the next scripted result;
///   an exhausted script yields an empty batch
/// - **sent**: messages passed to `send_message()` are captured
pub struct MockSource {
    listings: Mutex<VecDeque<Result<Vec<InboundSms>, String>>>,
    sent: Mutex<Vec<OutboundSms>>,
    list_calls: AtomicUsize,
    fail_sends: AtomicBool,
}

impl MockSource {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self {
            listings: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            fail_sends: AtomicBool::new(false),
        }
    }

    /// Queue a batch for a future `list_messages()` call.
    pub async fn push_batch(&self, batch: Vec<InboundSms>) {
        self.listings.lock().await.push_back(Ok(batch));
    }

    /// Queue a listing failure.
    pub async fn push_failure(&self, message: &str) {
        self.listings.lock().await.push_back(Err(message.to_string()));
    }

    /// Make every subsequent `send_message()` fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// All messages sent so far.
    pub async fn sent_messages(&self) -> Vec<OutboundSms> {
        self.sent.lock().await.clone()
    }

    /// Bodies of messages sent to `to`, in order.
    pub async fn sent_to(&self, to: &str) -> Vec<String> {
        let to = PhoneNumber::new(to);
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.to == to)
            .map(|m| m.body.clone())
            .collect()
    }

    /// Number of `list_messages()` calls.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MessageSource
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        Ok(())
    }
}

#[async_trait]
impl MessageSource for MockSource {
    async fn list_messages(&self, _sent_on: NaiveDate) -> Result<Vec<InboundSms>, ButlerError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match self.listings.lock().await.pop_front() {
            Some(Ok(batch)) => Ok(batch),
            Some(Err(message)) => Err(ButlerError::Transport {
                message,
                source: None,
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn send_message(&self, msg: OutboundSms) -> Result<MessageSid, ButlerError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ButlerError::Transport {
                message: format!("mock send to {} failed", msg.to),
                source: None,
            });
        }
        let mut sent = self.sent.lock().await;
        sent.push(msg);
        Ok(MessageSid(format!("SMmock{}", sent.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[tokio::test]
    async fn listings_follow_script_then_run_dry() {
        let source = MockSource::new();
        source.push_batch(vec![sms("SM1", "+1", "open")]).await;
        source.push_failure("boom").await;

        assert_eq!(source.list_messages(today()).await.unwrap().len(), 1);
        assert!(source.list_messages(today()).await.is_err());
        assert!(source.list_messages(today()).await.unwrap().is_empty());
        assert_eq!(source.list_calls(), 3);
    }

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let source = MockSource::new();
        let sid = source
            .send_message(OutboundSms {
                to: PhoneNumber::new("+1 469 555 1212"),
                from: PhoneNumber::new(SERVICE_NUMBER),
                body: "hi".into(),
            })
            .await
            .unwrap();
        assert_eq!(sid.as_str(), "SMmock1");
        assert_eq!(source.sent_to("+14695551212").await, vec!["hi"]);
    }

    #[tokio::test]
    async fn failing_sends_capture_nothing() {
        let source = MockSource::new();
        source.fail_sends(true);
        let result = source
            .send_message(OutboundSms {
                to: PhoneNumber::new("+1"),
                from: PhoneNumber::new(SERVICE_NUMBER),
                body: "hi".into(),
            })
            .await;
        assert!(result.is_err());
        assert!(source.sent_messages().await.is_empty());
    }
}
