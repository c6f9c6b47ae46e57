// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording actuator.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use butler_core::{Actuator, AdapterType, ButlerError, HealthStatus, PluginAdapter};

/// One call made on the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    TriggerOpen,
    CaptureStill,
    CaptureClip,
    ReleaseSafe,
}

/// An `Actuator` that records calls and can be told to fail them.
pub struct MockActuator {
    calls: Mutex<Vec<ActuatorCall>>,
    fail: AtomicBool,
}

impl MockActuator {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every call fail (the call is still recorded).
    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.lock().await.clone()
    }

    /// Number of relay pulses.
    pub async fn open_count(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| **c == ActuatorCall::TriggerOpen)
            .count()
    }

    async fn record(&self, call: ActuatorCall) -> Result<(), ButlerError> {
        self.calls.lock().await.push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ButlerError::Actuator {
                message: format!("mock {call:?} failed"),
                source: None,
            });
        }
        Ok(())
    }
}

impl Default for MockActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockActuator {
    fn name(&self) -> &str {
        "mock-actuator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Actuator
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        Ok(())
    }
}

#[async_trait]
impl Actuator for MockActuator {
    async fn trigger_open(&self) -> Result<(), ButlerError> {
        self.record(ActuatorCall::TriggerOpen).await
    }

    async fn capture_still(&self) -> Result<(), ButlerError> {
        self.record(ActuatorCall::CaptureStill).await
    }

    async fn capture_clip_and_upload(&self) -> Result<(), ButlerError> {
        self.record(ActuatorCall::CaptureClip).await
    }

    async fn release_safe(&self) -> Result<(), ButlerError> {
        self.record(ActuatorCall::ReleaseSafe).await
    }
}
