// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the LedgerAdapter trait.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use butler_config::model::StorageConfig;
use butler_core::{
    AdapterType, ButlerError, HealthStatus, LedgerAdapter, MessageSid, PhoneNumber, PluginAdapter,
};

use crate::database::{Database, map_tr_err};
use crate::migrations;
use crate::models::AuthorizedSender;
use crate::queries;

/// SQLite-backed ledger.
///
/// The database is opened lazily by [`SqliteLedger::initialize`]; every
/// other call fails with a storage error until then.
pub struct SqliteLedger {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteLedger {
    /// Create a ledger for the given configuration without opening it.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), ButlerError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ButlerError::Storage {
            source: "ledger already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite ledger initialized");
        Ok(())
    }

    /// Path of the backing database file.
    pub fn database_path(&self) -> &str {
        &self.config.database_path
    }

    fn db(&self) -> Result<&Database, ButlerError> {
        self.db.get().ok_or_else(|| ButlerError::Storage {
            source: "ledger not initialized -- call initialize() first".into(),
        })
    }

    /// Authorized senders with their labels, for operator listings.
    pub async fn list_authorized(&self) -> Result<Vec<AuthorizedSender>, ButlerError> {
        queries::authorized::list_authorized(self.db()?).await
    }

    /// Authorize a number. Returns `false` if it was already present.
    pub async fn add_authorized(
        &self,
        phone: &PhoneNumber,
        label: Option<&str>,
    ) -> Result<bool, ButlerError> {
        queries::authorized::add_authorized(self.db()?, phone, label).await
    }

    /// Look up one authorized number with its label.
    pub async fn get_authorized(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<AuthorizedSender>, ButlerError> {
        queries::authorized::get_authorized(self.db()?, phone).await
    }

    /// Checkpoint and close the database. Used by one-shot CLI commands.
    pub async fn close(self) -> Result<(), ButlerError> {
        match self.db.into_inner() {
            Some(db) => db.close().await,
            None => Ok(()),
        }
    }

    /// Revoke a number. Returns `false` if it was not present.
    pub async fn remove_authorized(&self, phone: &PhoneNumber) -> Result<bool, ButlerError> {
        queries::authorized::remove_authorized(self.db()?, phone).await
    }

    /// Number of processed message ids on record.
    pub async fn processed_count(&self) -> Result<i64, ButlerError> {
        queries::processed::count_processed(self.db()?).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("ledger not initialized".to_string()));
        };
        let applied = db
            .connection()
            .call(|conn| migrations::applied_version(conn))
            .await
            .map_err(map_tr_err)?;
        let latest = migrations::latest_version();
        if applied != latest {
            return Ok(HealthStatus::Degraded(format!(
                "schema at {applied:?}, this build expects {latest:?}"
            )));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerAdapter for SqliteLedger {
    async fn load_authorized(&self) -> Result<HashSet<PhoneNumber>, ButlerError> {
        let rows = queries::authorized::list_authorized(self.db()?).await?;
        Ok(rows.iter().map(|r| PhoneNumber::new(&r.phone)).collect())
    }

    async fn load_processed_ids(&self) -> Result<HashSet<MessageSid>, ButlerError> {
        queries::processed::load_processed_ids(self.db()?).await
    }

    async fn record_processed_id(&self, sid: &MessageSid) -> Result<(), ButlerError> {
        queries::processed::record_processed(self.db()?, sid).await
    }
}
