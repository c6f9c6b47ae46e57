// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity, health and lifecycle shared by every external collaborator.

use async_trait::async_trait;

use crate::error::ButlerError;
use crate::types::{AdapterType, HealthStatus};

/// Base trait for the message source, ledger, actuator and mailer.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short name used in logs and `butler doctor` output.
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Check the backing resource without side effects.
    async fn health_check(&self) -> Result<HealthStatus, ButlerError>;

    /// Return the adapter to a resting state before the process exits.
    async fn shutdown(&self) -> Result<(), ButlerError>;

    /// Fail unless the health check reports [`HealthStatus::Healthy`] or
    /// [`HealthStatus::Degraded`]. Used to refuse startup on dead hardware.
    async fn ensure_healthy(&self) -> Result<(), ButlerError> {
        match self.health_check().await? {
            HealthStatus::Healthy => Ok(()),
            HealthStatus::Degraded(reason) => {
                tracing::warn!(adapter = self.name(), %reason, "adapter degraded");
                Ok(())
            }
            HealthStatus::Unhealthy(reason) => Err(ButlerError::Internal(format!(
                "{} adapter unhealthy: {reason}",
                self.name()
            ))),
        }
    }
}
