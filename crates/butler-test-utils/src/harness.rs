// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end dispatcher and poll loop tests.
//!
//! `TestHarness` wires a [`CommandDispatcher`] to mock adapters and exposes
//! them for assertions.

use std::sync::Arc;
use std::time::Duration;

use butler_agent::{CommandDispatcher, DispatchOutcome, ExitReason, PollLoop};
use butler_core::{Actuator, ButlerError, InboundSms, LedgerAdapter, MessageSource, NotificationSink};
use tokio_util::sync::CancellationToken;

use crate::mock_actuator::MockActuator;
use crate::mock_ledger::MockLedger;
use crate::mock_notifier::MockNotifier;
use crate::mock_source::MockSource;

/// The owner-authorized phone used by default.
pub const ALICE: &str = "+14695551212";

/// A phone that is never authorized.
pub const MALLORY: &str = "+13125550199";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    authorized: Vec<String>,
    processed: Vec<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            authorized: vec![ALICE.to_string()],
            processed: Vec::new(),
        }
    }

    /// Replace the authorized senders.
    pub fn with_authorized(mut self, numbers: &[&str]) -> Self {
        self.authorized = numbers.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Pre-populate the ledger with processed ids.
    pub fn with_processed(mut self, sids: &[&str]) -> Self {
        self.processed = sids.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Build the harness, loading the dispatcher from the mock ledger.
    pub async fn build(self) -> Result<TestHarness, ButlerError> {
        let ledger = Arc::new(MockLedger::new());
        let authorized: Vec<&str> = self.authorized.iter().map(String::as_str).collect();
        let processed: Vec<&str> = self.processed.iter().map(String::as_str).collect();
        ledger.seed(&authorized, &processed).await;

        let actuator = Arc::new(MockActuator::new());
        let notifier = Arc::new(MockNotifier::new());
        let dispatcher = CommandDispatcher::load(
            Arc::clone(&ledger) as Arc<dyn LedgerAdapter>,
            Arc::clone(&actuator) as Arc<dyn Actuator>,
            Arc::clone(&notifier) as Arc<dyn NotificationSink>,
        )
        .await?;

        Ok(TestHarness {
            source: Arc::new(MockSource::new()),
            ledger,
            actuator,
            notifier,
            dispatcher: Some(dispatcher),
        })
    }
}

/// A dispatcher wired to mock adapters.
pub struct TestHarness {
    pub source: Arc<MockSource>,
    pub ledger: Arc<MockLedger>,
    pub actuator: Arc<MockActuator>,
    pub notifier: Arc<MockNotifier>,
    dispatcher: Option<CommandDispatcher>,
}

impl TestHarness {
    /// Harness with one authorized sender, [`ALICE`].
    pub async fn new() -> Result<Self, ButlerError> {
        Self::builder().build().await
    }

    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The dispatcher, until it is moved into a poll loop.
    ///
    /// # Panics
    /// Panics after [`TestHarness::run_poll_loop`].
    pub fn dispatcher(&self) -> &CommandDispatcher {
        self.dispatcher.as_ref().expect("dispatcher moved into poll loop")
    }

    /// Dispatch one batch directly.
    ///
    /// # Panics
    /// Panics after [`TestHarness::run_poll_loop`].
    pub async fn dispatch(&mut self, batch: Vec<InboundSms>) -> DispatchOutcome {
        self.dispatcher
            .as_mut()
            .expect("dispatcher moved into poll loop")
            .dispatch(&batch)
            .await
    }

    /// Move the dispatcher into a poll loop over [`TestHarness::source`] and
    /// run it until it stops.
    ///
    /// # Panics
    /// Panics if called twice.
    pub async fn run_poll_loop(&mut self, interval: Duration, cancel: CancellationToken) -> ExitReason {
        let dispatcher = self
            .dispatcher
            .take()
            .expect("poll loop already started");
        let mut poll = PollLoop::new(
            Arc::clone(&self.source) as Arc<dyn MessageSource>,
            dispatcher,
            Arc::clone(&self.actuator) as Arc<dyn Actuator>,
            Arc::clone(&self.notifier) as Arc<dyn NotificationSink>,
            interval,
        );
        poll.run(cancel).await
    }
}
