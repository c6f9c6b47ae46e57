// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable ledger trait for authorized senders and processed message ids.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::ButlerError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageSid, PhoneNumber};

/// Persistent store consulted by the dispatcher.
///
/// Both sets are read once at startup. The processed-id set is appended to
/// for every accepted message; the authorized set is only read.
#[async_trait]
pub trait LedgerAdapter: PluginAdapter {
    /// Loads every authorized sender identity.
    async fn load_authorized(&self) -> Result<HashSet<PhoneNumber>, ButlerError>;

    /// Loads every message identifier that was already acted upon.
    async fn load_processed_ids(&self) -> Result<HashSet<MessageSid>, ButlerError>;

    /// Records a processed identifier. Must be durable before returning `Ok`.
    async fn record_processed_id(&self, sid: &MessageSid) -> Result<(), ButlerError>;
}
