// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory ledger with failure injection.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use butler_core::{
    AdapterType, ButlerError, HealthStatus, LedgerAdapter, MessageSid, PhoneNumber, PluginAdapter,
};

/// A `LedgerAdapter` backed by two hash sets.
pub struct MockLedger {
    authorized: Mutex<HashSet<PhoneNumber>>,
    processed: Mutex<HashSet<MessageSid>>,
    recorded: Mutex<Vec<MessageSid>>,
    /// Ids whose next `record_processed_id()` call fails.
    fail_once: Mutex<HashSet<MessageSid>>,
    fail_loads: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            authorized: Mutex::new(HashSet::new()),
            processed: Mutex::new(HashSet::new()),
            recorded: Mutex::new(Vec::new()),
            fail_once: Mutex::new(HashSet::new()),
            fail_loads: AtomicBool::new(false),
        }
    }

    /// Seed the ledger with authorized numbers and already-processed ids.
    pub async fn seed(&self, authorized: &[&str], processed: &[&str]) {
        self.authorized
            .lock()
            .await
            .extend(authorized.iter().map(|p| PhoneNumber::new(p)));
        self.processed
            .lock()
            .await
            .extend(processed.iter().map(|s| MessageSid(s.to_string())));
    }

    /// Make the next write of `sid` fail.
    pub async fn fail_next_record(&self, sid: &str) {
        self.fail_once
            .lock()
            .await
            .insert(MessageSid(sid.to_string()));
    }

    /// Make both load calls fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Ids successfully recorded, in write order.
    pub async fn recorded(&self) -> Vec<MessageSid> {
        self.recorded.lock().await.clone()
    }

    fn check_loads(&self) -> Result<(), ButlerError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(ButlerError::Storage {
                source: "mock ledger unavailable".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockLedger {
    fn name(&self) -> &str {
        "mock-ledger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        Ok(())
    }
}

#[async_trait]
impl LedgerAdapter for MockLedger {
    async fn load_authorized(&self) -> Result<HashSet<PhoneNumber>, ButlerError> {
        self.check_loads()?;
        Ok(self.authorized.lock().await.clone())
    }

    async fn load_processed_ids(&self) -> Result<HashSet<MessageSid>, ButlerError> {
        self.check_loads()?;
        Ok(self.processed.lock().await.clone())
    }

    async fn record_processed_id(&self, sid: &MessageSid) -> Result<(), ButlerError> {
        if self.fail_once.lock().await.remove(sid) {
            return Err(ButlerError::Storage {
                source: format!("injected write failure for {sid}").into(),
            });
        }
        self.processed.lock().await.insert(sid.clone());
        self.recorded.lock().await.push(sid.clone());
        Ok(())
    }
}
