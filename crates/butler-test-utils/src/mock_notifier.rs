// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording notification sink and mail transport.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use butler_core::{
    AdapterType, ButlerError, HealthStatus, MailTransport, NotificationSink, PhoneNumber,
    PluginAdapter,
};

/// A notification attempt, recorded whether or not it "succeeded".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Owner { subject: String, body: String },
    Reply { to: PhoneNumber, body: String },
}

/// A `NotificationSink` that records every attempt.
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: AtomicBool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every attempt fail after being recorded.
    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn all(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }

    /// Bodies of owner notifications, in order.
    pub async fn owner_bodies(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|n| match n {
                Notification::Owner { body, .. } => Some(body.clone()),
                Notification::Reply { .. } => None,
            })
            .collect()
    }

    /// Bodies of replies sent to `to`, in order.
    pub async fn replies_to(&self, to: &str) -> Vec<String> {
        let to = PhoneNumber::new(to);
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|n| match n {
                Notification::Reply { to: t, body } if *t == to => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    async fn record(&self, n: Notification) -> Result<(), ButlerError> {
        self.sent.lock().await.push(n);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ButlerError::Notification {
                message: "mock notifier failure".into(),
                source: None,
            });
        }
        Ok(())
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for MockNotifier {
    async fn notify_owner(&self, subject: &str, body: &str) -> Result<(), ButlerError> {
        self.record(Notification::Owner {
            subject: subject.to_string(),
            body: body.to_string(),
        })
        .await
    }

    async fn reply_to_sender(&self, to: &PhoneNumber, body: &str) -> Result<(), ButlerError> {
        self.record(Notification::Reply {
            to: to.clone(),
            body: body.to_string(),
        })
        .await
    }
}

/// One email handed to [`MockMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// A `MailTransport` that records messages.
pub struct MockMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockMailer {
    fn name(&self) -> &str {
        "mock-mailer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mail
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        Ok(())
    }
}

#[async_trait]
impl MailTransport for MockMailer {
    async fn send_mail(&self, to: &[String], subject: &str, body: &str) -> Result<(), ButlerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ButlerError::Notification {
                message: "mock mailer failure".into(),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMail {
            to: to.to_vec(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
