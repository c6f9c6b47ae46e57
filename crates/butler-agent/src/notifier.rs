// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification fan-out over SMS and, optionally, email.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use butler_core::{
    ButlerError, MailTransport, MessageSource, NotificationSink, OutboundSms, PhoneNumber,
};

/// [`NotificationSink`] that replies through the message source and alerts
/// every owner number, mirroring owner alerts to email when a mailer is set.
pub struct OwnerNotifier {
    source: Arc<dyn MessageSource>,
    from: PhoneNumber,
    owners: Vec<PhoneNumber>,
    mail: Option<(Arc<dyn MailTransport>, Vec<String>)>,
}

impl OwnerNotifier {
    pub fn new(source: Arc<dyn MessageSource>, from: PhoneNumber, owners: Vec<PhoneNumber>) -> Self {
        Self {
            source,
            from,
            owners,
            mail: None,
        }
    }

    /// Also mail owner alerts to `recipients`.
    pub fn with_mail(mut self, mailer: Arc<dyn MailTransport>, recipients: Vec<String>) -> Self {
        self.mail = Some((mailer, recipients));
        self
    }

    async fn send_sms(&self, to: &PhoneNumber, body: &str) -> Result<(), ButlerError> {
        let sid = self
            .source
            .send_message(OutboundSms {
                to: to.clone(),
                from: self.from.clone(),
                body: body.to_string(),
            })
            .await?;
        debug!(%sid, %to, "sms sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for OwnerNotifier {
    /// Every channel is attempted; the first failure is returned.
    async fn notify_owner(&self, subject: &str, body: &str) -> Result<(), ButlerError> {
        let mut first_error = None;

        for owner in &self.owners {
            if let Err(e) = self.send_sms(owner, body).await {
                warn!(%owner, error = %e, "owner sms failed");
                first_error.get_or_insert(e);
            }
        }

        if let Some((mailer, recipients)) = &self.mail
            && let Err(e) = mailer.send_mail(recipients, subject, body).await
        {
            warn!(error = %e, "owner email failed");
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn reply_to_sender(&self, to: &PhoneNumber, body: &str) -> Result<(), ButlerError> {
        self.send_sms(to, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use butler_test_utils::{MockMailer, MockSource, SERVICE_NUMBER};

    const OWNER_A: &str = "+14695551212";
    const OWNER_B: &str = "+14695553434";

    fn notifier(source: &Arc<MockSource>) -> OwnerNotifier {
        OwnerNotifier::new(
            Arc::clone(source) as Arc<dyn MessageSource>,
            PhoneNumber::new(SERVICE_NUMBER),
            vec![PhoneNumber::new(OWNER_A), PhoneNumber::new(OWNER_B)],
        )
    }

    #[tokio::test]
    async fn owner_alert_reaches_every_owner_number() {
        let source = Arc::new(MockSource::new());
        notifier(&source)
            .notify_owner("Garage opened", "Garage opened from phone +1")
            .await
            .unwrap();

        assert_eq!(source.sent_to(OWNER_A).await, vec!["Garage opened from phone +1"]);
        assert_eq!(source.sent_to(OWNER_B).await, vec!["Garage opened from phone +1"]);
        let sent = source.sent_messages().await;
        assert!(sent.iter().all(|m| m.from.as_str() == SERVICE_NUMBER));
    }

    #[tokio::test]
    async fn owner_alert_is_mirrored_to_email() {
        let source = Arc::new(MockSource::new());
        let mailer = Arc::new(MockMailer::new());
        let notifier = notifier(&source).with_mail(
            Arc::clone(&mailer) as Arc<dyn MailTransport>,
            vec!["owner@example.com".to_string()],
        );

        notifier.notify_owner("Garage butler killed", "bye").await.unwrap();

        let mail = mailer.sent().await;
        assert_eq!(mail.len(), 1);
        assert_eq!(mail[0].subject, "Garage butler killed");
        assert_eq!(mail[0].to, vec!["owner@example.com"]);
    }

    #[tokio::test]
    async fn sms_failure_still_attempts_email() {
        let source = Arc::new(MockSource::new());
        source.fail_sends(true);
        let mailer = Arc::new(MockMailer::new());
        let notifier = notifier(&source).with_mail(
            Arc::clone(&mailer) as Arc<dyn MailTransport>,
            vec!["owner@example.com".to_string()],
        );

        let result = notifier.notify_owner("subject", "body").await;

        assert!(result.is_err());
        assert_eq!(mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn email_failure_is_reported() {
        let source = Arc::new(MockSource::new());
        let mailer = Arc::new(MockMailer::new());
        mailer.fail_all(true);
        let notifier = notifier(&source).with_mail(
            Arc::clone(&mailer) as Arc<dyn MailTransport>,
            vec!["owner@example.com".to_string()],
        );

        assert!(notifier.notify_owner("subject", "body").await.is_err());
        assert_eq!(source.sent_messages().await.len(), 2);
    }

    #[tokio::test]
    async fn reply_goes_only_to_sender() {
        let source = Arc::new(MockSource::new());
        notifier(&source)
            .reply_to_sender(&PhoneNumber::new("+13125550000"), "ack")
            .await
            .unwrap();

        assert_eq!(source.sent_to("+13125550000").await, vec!["ack"]);
        assert!(source.sent_to(OWNER_A).await.is_empty());
    }
}
