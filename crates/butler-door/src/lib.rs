// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Garage door actuator for the Butler daemon.
//!
//! Combines a pulsed [`Relay`] with an optional [`Camera`] and exposes them
//! through the [`Actuator`] trait.

pub mod camera;
pub mod pin;
pub mod relay;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use butler_config::model::{CameraConfig, DoorBackend, DoorConfig};
use butler_core::{Actuator, AdapterType, ButlerError, HealthStatus, PluginAdapter};
use embedded_hal::digital::OutputPin;
use tracing::{debug, info};

pub use crate::camera::{Camera, CaptureKind};
pub use crate::pin::{DryRunPin, SysfsPin};
pub use crate::relay::Relay;

/// Relay plus camera behind the [`Actuator`] trait.
pub struct DoorActuator<P> {
    name: String,
    relay: Relay<P>,
    camera: Camera,
    /// File that must exist for the backend to be healthy.
    health_path: Option<PathBuf>,
}

impl<P> DoorActuator<P>
where
    P: OutputPin + Send + 'static,
{
    pub fn new(name: impl Into<String>, relay: Relay<P>, camera: Camera) -> Self {
        Self {
            name: name.into(),
            relay,
            camera,
            health_path: None,
        }
    }

    /// Report unhealthy whenever `path` is missing.
    pub fn with_health_path(mut self, path: PathBuf) -> Self {
        self.health_path = Some(path);
        self
    }

    async fn capture_and_upload(&self, kind: CaptureKind) -> Result<(), ButlerError> {
        if !self.camera.is_enabled() {
            debug!(?kind, "camera disabled; skipping capture");
            return Ok(());
        }
        let path = self.camera.capture(kind).await?;
        self.camera.upload(&path, kind).await?;
        Ok(())
    }
}

/// Build the actuator selected by `[door] backend`.
pub fn build_actuator(
    door: &DoorConfig,
    camera: &CameraConfig,
) -> Result<Arc<dyn Actuator>, ButlerError> {
    let pulse = Duration::from_millis(door.pulse_ms);
    let camera = Camera::new(camera)?;

    let actuator: Arc<dyn Actuator> = match door.backend {
        DoorBackend::Sysfs => {
            let pin = SysfsPin::export(std::path::Path::new(&door.gpio_root), door.gpio_pin)
                .map_err(|e| ButlerError::Actuator {
                    message: format!("cannot open relay gpio: {e}"),
                    source: Some(Box::new(e)),
                })?;
            let health_path = pin.value_path().to_path_buf();
            let relay = Relay::new(pin, door.active_low, pulse)?;
            Arc::new(DoorActuator::new("sysfs-relay", relay, camera).with_health_path(health_path))
        }
        DoorBackend::DryRun => {
            let relay = Relay::new(DryRunPin::new(door.gpio_pin), door.active_low, pulse)?;
            Arc::new(DoorActuator::new("dry-run-relay", relay, camera))
        }
    };

    info!(
        backend = ?door.backend,
        gpio_pin = door.gpio_pin,
        active_low = door.active_low,
        pulse_ms = door.pulse_ms,
        "door actuator ready"
    );
    Ok(actuator)
}

#[async_trait]
impl<P> PluginAdapter for DoorActuator<P>
where
    P: OutputPin + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Actuator
    }

    async fn health_check(&self) -> Result<HealthStatus, ButlerError> {
        match &self.health_path {
            Some(path) if !path.exists() => Ok(HealthStatus::Unhealthy(format!(
                "{} is missing",
                path.display()
            ))),
            _ => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), ButlerError> {
        self.relay.release().await
    }
}

#[async_trait]
impl<P> Actuator for DoorActuator<P>
where
    P: OutputPin + Send + 'static,
{
    async fn trigger_open(&self) -> Result<(), ButlerError> {
        self.relay.pulse().await
    }

    async fn capture_still(&self) -> Result<(), ButlerError> {
        self.capture_and_upload(CaptureKind::Still).await
    }

    async fn capture_clip_and_upload(&self) -> Result<(), ButlerError> {
        self.capture_and_upload(CaptureKind::Clip).await
    }

    async fn release_safe(&self) -> Result<(), ButlerError> {
        self.relay.release().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door(backend: DoorBackend, root: &std::path::Path) -> DoorConfig {
        DoorConfig {
            backend,
            gpio_pin: 23,
            active_low: false,
            pulse_ms: 50,
            gpio_root: root.to_string_lossy().into_owned(),
        }
    }

    #[tokio::test]
    async fn dry_run_backend_pulses_without_hardware() {
        let root = tempfile::tempdir().unwrap();
        let actuator =
            build_actuator(&door(DoorBackend::DryRun, root.path()), &CameraConfig::default())
                .unwrap();
        assert_eq!(actuator.name(), "dry-run-relay");
        actuator.trigger_open().await.unwrap();
        actuator.release_safe().await.unwrap();
        // Camera disabled: captures are no-ops.
        actuator.capture_still().await.unwrap();
        actuator.capture_clip_and_upload().await.unwrap();
        assert_eq!(actuator.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn sysfs_backend_leaves_line_released() {
        let root = tempfile::tempdir().unwrap();
        let gpio = root.path().join("gpio23");
        std::fs::create_dir_all(&gpio).unwrap();
        std::fs::write(gpio.join("direction"), "in").unwrap();
        std::fs::write(gpio.join("value"), "1").unwrap();

        let actuator =
            build_actuator(&door(DoorBackend::Sysfs, root.path()), &CameraConfig::default())
                .unwrap();
        assert_eq!(std::fs::read_to_string(gpio.join("value")).unwrap(), "0");

        actuator.trigger_open().await.unwrap();
        assert_eq!(std::fs::read_to_string(gpio.join("value")).unwrap(), "0");
        assert_eq!(actuator.health_check().await.unwrap(), HealthStatus::Healthy);

        std::fs::remove_file(gpio.join("value")).unwrap();
        assert!(matches!(
            actuator.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn enabled_camera_captures_on_status() {
        let root = tempfile::tempdir().unwrap();
        let captures = tempfile::tempdir().unwrap();
        let camera = CameraConfig {
            enabled: true,
            still_command: "printf x > {output}".into(),
            output_dir: captures.path().to_string_lossy().into_owned(),
            ..CameraConfig::default()
        };
        let actuator = build_actuator(&door(DoorBackend::DryRun, root.path()), &camera).unwrap();
        actuator.capture_still().await.unwrap();
        assert_eq!(std::fs::read_dir(captures.path()).unwrap().count(), 1);
    }
}
