// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types returned by the ledger queries.

use serde::Serialize;

/// One row of the `authorized_senders` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizedSender {
    /// Normalized phone number.
    pub phone: String,
    /// Free-form note such as the person's name.
    pub label: Option<String>,
    /// ISO 8601 timestamp.
    pub added_at: String,
}
