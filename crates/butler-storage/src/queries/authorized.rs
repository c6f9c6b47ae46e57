// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorized-sender CRUD operations.
//!
//! Phone numbers are normalized before they are written so lookups compare
//! like with like.

use butler_core::{ButlerError, PhoneNumber};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::models::AuthorizedSender;

/// List every authorized sender, oldest first.
pub async fn list_authorized(db: &Database) -> Result<Vec<AuthorizedSender>, ButlerError> {
    db.connection()
        .call(|conn| -> Result<Vec<AuthorizedSender>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT phone, label, added_at FROM authorized_senders
                 ORDER BY added_at ASC, phone ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(AuthorizedSender {
                    phone: row.get(0)?,
                    label: row.get(1)?,
                    added_at: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Add a sender. Returns `false` if the number was already authorized.
pub async fn add_authorized(
    db: &Database,
    phone: &PhoneNumber,
    label: Option<&str>,
) -> Result<bool, ButlerError> {
    let phone = phone.as_str().to_string();
    let label = label.map(str::to_string);
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO authorized_senders (phone, label) VALUES (?1, ?2)",
                params![phone, label],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Remove a sender. Returns `false` if the number was not present.
pub async fn remove_authorized(db: &Database, phone: &PhoneNumber) -> Result<bool, ButlerError> {
    let phone = phone.as_str().to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute(
                "DELETE FROM authorized_senders WHERE phone = ?1",
                params![phone],
            )?;
            Ok(deleted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Look up a single sender.
pub async fn get_authorized(
    db: &Database,
    phone: &PhoneNumber,
) -> Result<Option<AuthorizedSender>, ButlerError> {
    let phone = phone.as_str().to_string();
    db.connection()
        .call(move |conn| -> Result<Option<AuthorizedSender>, rusqlite::Error> {
            conn.query_row(
                "SELECT phone, label, added_at FROM authorized_senders WHERE phone = ?1",
                params![phone],
                |row| {
                    Ok(AuthorizedSender {
                        phone: row.get(0)?,
                        label: row.get(1)?,
                        added_at: row.get(2)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_list_remove_round() {
        let db = Database::open_in_memory().await.unwrap();
        let alice = PhoneNumber::new("+1 (469) 555-1212");

        assert!(add_authorized(&db, &alice, Some("alice")).await.unwrap());
        assert!(!add_authorized(&db, &alice, None).await.unwrap());

        let all = list_authorized(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].phone, "+14695551212");
        assert_eq!(all[0].label.as_deref(), Some("alice"));
        assert!(!all[0].added_at.is_empty());

        assert!(remove_authorized(&db, &alice).await.unwrap());
        assert!(!remove_authorized(&db, &alice).await.unwrap());
        assert!(list_authorized(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_missing_sender_is_none() {
        let db = Database::open_in_memory().await.unwrap();
        let bob = PhoneNumber::new("+12145550000");
        assert!(get_authorized(&db, &bob).await.unwrap().is_none());
        add_authorized(&db, &bob, None).await.unwrap();
        let row = get_authorized(&db, &bob).await.unwrap().unwrap();
        assert_eq!(row.label, None);
    }
}
