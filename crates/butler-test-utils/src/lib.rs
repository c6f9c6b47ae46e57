// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Butler integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without an SMS provider, a database or a relay.
//!
//! # Components
//!
//! - [`MockSource`] - Scripted message listings with captured outbound SMS
//! - [`MockLedger`] - In-memory ledger with write-failure injection
//! - [`MockActuator`] - Records relay and camera calls
//! - [`MockNotifier`] / [`MockMailer`] - Record notifications
//! - [`TestHarness`] - A dispatcher wired to all of the above

pub mod harness;
pub mod mock_actuator;
pub mod mock_ledger;
pub mod mock_notifier;
pub mod mock_source;

pub use harness::{ALICE, MALLORY, TestHarness, TestHarnessBuilder};
pub use mock_actuator::{ActuatorCall, MockActuator};
pub use mock_ledger::MockLedger;
pub use mock_notifier::{MockMailer, MockNotifier, Notification, SentMail};
pub use mock_source::{MockSource, SERVICE_NUMBER, sms, sms_with_status};
