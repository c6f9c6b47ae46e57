// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command dispatcher: status filter, dedup gate, authorization and
//! command handling for one batch of messages.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use butler_core::{
    Actuator, ButlerError, InboundSms, LedgerAdapter, MessageSid, NotificationSink, PhoneNumber,
};

use crate::command::{Command, classify};
use crate::state::ServiceState;

/// Result of dispatching one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Keep polling. `handled` counts messages that passed the dedup gate.
    Continue { handled: usize },
    /// An authorized sender asked the process to terminate.
    Kill { by: PhoneNumber },
}

/// Owns the service state and the in-memory mirrors of the ledger.
pub struct CommandDispatcher {
    ledger: Arc<dyn LedgerAdapter>,
    actuator: Arc<dyn Actuator>,
    notifier: Arc<dyn NotificationSink>,
    authorized: HashSet<PhoneNumber>,
    processed: HashSet<MessageSid>,
    state: ServiceState,
}

impl CommandDispatcher {
    /// Load the authorized set and processed ids from the ledger.
    ///
    /// Any ledger failure here is a startup failure.
    pub async fn load(
        ledger: Arc<dyn LedgerAdapter>,
        actuator: Arc<dyn Actuator>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, ButlerError> {
        let authorized = ledger.load_authorized().await?;
        let processed = ledger.load_processed_ids().await?;

        info!(
            authorized_users = authorized.len(),
            processed_messages = processed.len(),
            "service loaded"
        );
        if authorized.is_empty() {
            warn!("no authorized senders; every command will raise an intrusion alert");
        }

        Ok(Self {
            ledger,
            actuator,
            notifier,
            authorized,
            processed,
            state: ServiceState::new(Utc::now()),
        })
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub fn is_processed(&self, sid: &MessageSid) -> bool {
        self.processed.contains(sid)
    }

    /// Process a batch in order.
    ///
    /// Stops at the first `kill`; later messages are left unrecorded for the
    /// next process to handle.
    pub async fn dispatch(&mut self, batch: &[InboundSms]) -> DispatchOutcome {
        let mut handled = 0;

        for sms in batch {
            if !sms.status.is_received() {
                debug!(sid = %sms.sid, status = %sms.status, "skipping message still in transit");
                continue;
            }
            if self.processed.contains(&sms.sid) {
                continue;
            }

            // Persist before acting: a crash after this point never replays the command.
            if let Err(e) = self.ledger.record_processed_id(&sms.sid).await {
                warn!(sid = %sms.sid, error = %e, "failed to record message id; will retry next poll");
                continue;
            }
            self.processed.insert(sms.sid.clone());
            handled += 1;

            if let Some(outcome) = self.handle(sms).await {
                return outcome;
            }
        }

        DispatchOutcome::Continue { handled }
    }

    async fn handle(&mut self, sms: &InboundSms) -> Option<DispatchOutcome> {
        let from = &sms.from;

        if !self.authorized.contains(from) {
            warn!(sender = %from, "unauthorized sender");
            self.owner(
                "Unauthorized garage access",
                &format!("Unauthorized phone tried opening garage: {from}"),
            )
            .await;
            return None;
        }

        let Some(command) = classify(&sms.body) else {
            debug!(sender = %from, "ignoring unrecognized message");
            return None;
        };
        info!(sender = %from, %command, sid = %sms.sid, "command received");

        match command {
            Command::Kill => {
                self.reply(from, "Received KILL command from you. Bailing to terminal now!")
                    .await;
                self.owner(
                    "Garage butler killed",
                    &format!("Received KILL command from phone number {from}. Exiting application!"),
                )
                .await;
                return Some(DispatchOutcome::Kill { by: from.clone() });
            }
            Command::Disable => {
                self.state.set_enabled(false);
                self.reply(from, "Received DISABLE command from you. Send ENABLE to restart")
                    .await;
                self.owner(
                    "Garage butler disabled",
                    &format!(
                        "Received DISABLE command from phone number {from}. Send ENABLE to restart"
                    ),
                )
                .await;
            }
            Command::Enable => {
                self.state.set_enabled(true);
                self.reply(from, "Received ENABLE command from you. Service is now enabled")
                    .await;
                self.owner(
                    "Garage butler enabled",
                    &format!(
                        "Received ENABLE command from phone number {from}. Service is now enabled"
                    ),
                )
                .await;
            }
            Command::Status => {
                if let Err(e) = self.actuator.capture_still().await {
                    warn!(error = %e, "still capture failed");
                }
                let body = self.state.status_reply();
                self.reply(from, &body).await;
            }
            Command::Open if !self.state.is_enabled() => {
                info!(sender = %from, "open requested while disabled; ignoring");
            }
            Command::Open => self.open(from).await,
        }

        None
    }

    async fn open(&mut self, from: &PhoneNumber) {
        self.state.record_opening(from, Utc::now());
        info!(
            sender = %from,
            openings = self.state.opening_count(),
            "opening garage door"
        );

        if let Err(e) = self.actuator.trigger_open().await {
            warn!(error = %e, "relay trigger failed");
        }
        self.reply(from, "Command received, and sent to garage door").await;
        self.owner("Garage opened", &format!("Garage opened from phone {from}"))
            .await;

        if let Err(e) = self.actuator.capture_clip_and_upload().await {
            warn!(error = %e, "clip capture failed");
        }
    }

    async fn reply(&self, to: &PhoneNumber, body: &str) {
        if let Err(e) = self.notifier.reply_to_sender(to, body).await {
            warn!(%to, error = %e, "reply to sender failed");
        }
    }

    async fn owner(&self, subject: &str, body: &str) {
        if let Err(e) = self.notifier.notify_owner(subject, body).await {
            warn!(subject, error = %e, "owner notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use butler_test_utils::{MockActuator, MockLedger, MockNotifier};
    use tracing_test::traced_test;

    async fn load_with(authorized: &[&str], processed: &[&str]) -> CommandDispatcher {
        let ledger = Arc::new(MockLedger::new());
        ledger.seed(authorized, processed).await;
        CommandDispatcher::load(
            ledger,
            Arc::new(MockActuator::new()),
            Arc::new(MockNotifier::new()),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    #[traced_test]
    async fn load_logs_startup_summary() {
        let dispatcher = load_with(&["+14695551212"], &["SM1", "SM2"]).await;

        assert!(dispatcher.is_processed(&MessageSid("SM2".to_string())));
        assert!(logs_contain("service loaded"));
        assert!(logs_contain("authorized_users=1"));
        assert!(logs_contain("processed_messages=2"));
        assert!(!logs_contain("no authorized senders"));
    }

    #[tokio::test]
    #[traced_test]
    async fn empty_authorized_set_is_warned_about() {
        load_with(&[], &[]).await;
        assert!(logs_contain("no authorized senders"));
    }
}
