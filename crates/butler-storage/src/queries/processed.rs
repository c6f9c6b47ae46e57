// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processed-message ledger operations.

use std::collections::HashSet;

use butler_core::{ButlerError, MessageSid};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Load every processed message id.
pub async fn load_processed_ids(db: &Database) -> Result<HashSet<MessageSid>, ButlerError> {
    db.connection()
        .call(|conn| -> Result<HashSet<MessageSid>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT sid FROM processed_messages")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0).map(MessageSid))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Record a processed message id. Re-recording an existing id is a no-op.
///
/// Returns once the row is committed; with `synchronous = FULL` that means
/// it has reached disk.
pub async fn record_processed(db: &Database, sid: &MessageSid) -> Result<(), ButlerError> {
    let sid = sid.as_str().to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO processed_messages (sid) VALUES (?1)",
                params![sid],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Number of processed ids in the ledger.
pub async fn count_processed(db: &Database) -> Result<i64, ButlerError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM processed_messages", [], |row| {
                row.get(0)
            })
        })
        .await
        .map_err(map_tr_err)
}
