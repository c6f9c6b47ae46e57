// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Butler garage daemon.
//!
//! This crate provides the trait definitions, error type, and domain types
//! shared by the dispatcher and every external collaborator (SMS provider,
//! ledger, door relay, mailer).

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ButlerError;
pub use types::{
    AdapterType, DeliveryStatus, HealthStatus, InboundSms, MessageSid, OutboundSms, PhoneNumber,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    Actuator, LedgerAdapter, MailTransport, MessageSource, NotificationSink, PluginAdapter,
};
