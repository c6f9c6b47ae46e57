// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod actuator;
pub mod adapter;
pub mod ledger;
pub mod notify;
pub mod source;

pub use actuator::Actuator;
pub use adapter::PluginAdapter;
pub use ledger::LedgerAdapter;
pub use notify::{MailTransport, NotificationSink};
pub use source::MessageSource;
