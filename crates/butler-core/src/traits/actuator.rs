// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Actuator trait for the door relay and its evidence camera.

use async_trait::async_trait;

use crate::error::ButlerError;
use crate::traits::adapter::PluginAdapter;

/// Drives the physical door and records photo/video evidence.
///
/// All operations are best-effort from the dispatcher's point of view:
/// errors are logged at the call site and never abort dispatch.
#[async_trait]
pub trait Actuator: PluginAdapter {
    /// Pulses the door relay once.
    async fn trigger_open(&self) -> Result<(), ButlerError>;

    /// Captures a still image of the monitored area and uploads it.
    async fn capture_still(&self) -> Result<(), ButlerError>;

    /// Records a short clip and uploads it.
    async fn capture_clip_and_upload(&self) -> Result<(), ButlerError>;

    /// Drives the relay line to its safe (released) level.
    ///
    /// Called on every process exit path.
    async fn release_safe(&self) -> Result<(), ButlerError>;
}
