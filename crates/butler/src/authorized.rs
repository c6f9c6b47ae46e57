// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `butler authorized` subcommands: edit the authorized set in the ledger.
//!
//! A running daemon only reads this set at startup, so changes apply on the
//! next restart.

use butler_config::ButlerConfig;
use butler_core::{ButlerError, PhoneNumber};
use butler_storage::SqliteLedger;

async fn open_ledger(config: &ButlerConfig) -> Result<SqliteLedger, ButlerError> {
    let ledger = SqliteLedger::new(config.storage.clone());
    ledger.initialize().await?;
    Ok(ledger)
}

fn parse_phone(raw: &str) -> Result<PhoneNumber, ButlerError> {
    let phone = PhoneNumber::new(raw);
    if phone.is_empty() {
        return Err(ButlerError::Config(format!("`{raw}` is not a phone number")));
    }
    Ok(phone)
}

pub async fn add(config: &ButlerConfig, raw: &str, label: Option<&str>) -> Result<(), ButlerError> {
    let phone = parse_phone(raw)?;
    let ledger = open_ledger(config).await?;
    if ledger.add_authorized(&phone, label).await? {
        println!("authorized {phone}");
    } else {
        let existing = ledger.get_authorized(&phone).await?;
        match existing.and_then(|sender| sender.label) {
            Some(label) => println!("{phone} is already authorized as {label}"),
            None => println!("{phone} is already authorized"),
        }
    }
    ledger.close().await
}

pub async fn remove(config: &ButlerConfig, raw: &str) -> Result<(), ButlerError> {
    let phone = parse_phone(raw)?;
    let ledger = open_ledger(config).await?;
    if ledger.remove_authorized(&phone).await? {
        println!("revoked {phone}");
    } else {
        println!("{phone} was not authorized");
    }
    ledger.close().await
}

pub async fn list(config: &ButlerConfig) -> Result<(), ButlerError> {
    let ledger = open_ledger(config).await?;
    let senders = ledger.list_authorized().await?;
    if senders.is_empty() {
        println!("no authorized numbers in {}", ledger.database_path());
    }
    for sender in &senders {
        match &sender.label {
            Some(label) => println!("{:<16} {:<20} added {}", sender.phone, label, sender.added_at),
            None => println!("{:<16} {:<20} added {}", sender.phone, "-", sender.added_at),
        }
    }
    ledger.close().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use butler_core::LedgerAdapter;

    fn config_in(dir: &tempfile::TempDir) -> ButlerConfig {
        let mut config = ButlerConfig::default();
        config.storage.database_path = dir.path().join("ledger.db").display().to_string();
        config
    }

    #[tokio::test]
    async fn added_numbers_are_normalized_and_loaded_by_the_daemon() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        add(&config, "+1 (469) 555-1212", Some("Alice")).await.unwrap();
        add(&config, "+14695551212", None).await.unwrap();

        let ledger = open_ledger(&config).await.unwrap();
        let loaded = ledger.load_authorized().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains(&PhoneNumber::new("+14695551212")));
    }

    #[tokio::test]
    async fn remove_revokes_number() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        add(&config, "+14695551212", None).await.unwrap();
        remove(&config, "+14695551212").await.unwrap();
        remove(&config, "+14695551212").await.unwrap();

        let ledger = open_ledger(&config).await.unwrap();
        assert!(ledger.load_authorized().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_number_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = add(&config_in(&dir), " - ", None).await.unwrap_err();
        assert!(matches!(err, ButlerError::Config(_)));
    }
}
