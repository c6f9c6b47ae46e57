// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output pins behind `embedded_hal::digital::OutputPin`.
//!
//! [`SysfsPin`] drives a Linux GPIO line through `/sys/class/gpio`.
//! [`DryRunPin`] only logs, for hosts without a relay attached.

use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use thiserror::Error;
use tracing::{debug, info};

/// I/O failure on a sysfs GPIO attribute file.
#[derive(Debug, Error)]
#[error("gpio{pin}: {action}: {source}")]
pub struct SysfsPinError {
    pub pin: u32,
    pub action: &'static str,
    #[source]
    pub source: std::io::Error,
}

impl embedded_hal::digital::Error for SysfsPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A GPIO line exported through the sysfs interface.
#[derive(Debug)]
pub struct SysfsPin {
    pin: u32,
    value_path: PathBuf,
}

impl SysfsPin {
    /// Export `pin` under `root` (if not yet exported) and make it an output.
    pub fn export(root: &Path, pin: u32) -> Result<Self, SysfsPinError> {
        let dir = root.join(format!("gpio{pin}"));
        if !dir.exists() {
            fs::write(root.join("export"), pin.to_string()).map_err(|source| SysfsPinError {
                pin,
                action: "export",
                source,
            })?;
            debug!(pin, "exported gpio");
        }

        fs::write(dir.join("direction"), "out").map_err(|source| SysfsPinError {
            pin,
            action: "set direction",
            source,
        })?;

        Ok(Self {
            pin,
            value_path: dir.join("value"),
        })
    }

    /// The `value` attribute file this pin writes.
    pub fn value_path(&self) -> &Path {
        &self.value_path
    }

    fn write(&self, level: &str) -> Result<(), SysfsPinError> {
        fs::write(&self.value_path, level).map_err(|source| SysfsPinError {
            pin: self.pin,
            action: "write value",
            source,
        })
    }
}

impl ErrorType for SysfsPin {
    type Error = SysfsPinError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write("0")
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write("1")
    }
}

/// A pin that records its level and logs every change.
#[derive(Debug)]
pub struct DryRunPin {
    pin: u32,
    high: bool,
}

impl DryRunPin {
    pub fn new(pin: u32) -> Self {
        Self { pin, high: false }
    }

    fn write(&mut self, high: bool) {
        let changed = self.high != high;
        self.high = high;
        let level = if high { "high" } else { "low" };
        info!(pin = self.pin, level, changed, "dry-run gpio write");
    }
}

impl ErrorType for DryRunPin {
    type Error = Infallible;
}

impl OutputPin for DryRunPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_exported(root: &Path, pin: u32) {
        let dir = root.join(format!("gpio{pin}"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("direction"), "in").unwrap();
        fs::write(dir.join("value"), "0").unwrap();
    }

    #[test]
    fn already_exported_pin_becomes_output() {
        let root = tempfile::tempdir().unwrap();
        fake_exported(root.path(), 23);

        let mut pin = SysfsPin::export(root.path(), 23).unwrap();
        let dir = root.path().join("gpio23");
        assert_eq!(fs::read_to_string(dir.join("direction")).unwrap(), "out");

        pin.set_high().unwrap();
        assert_eq!(fs::read_to_string(pin.value_path()).unwrap(), "1");
        pin.set_low().unwrap();
        assert_eq!(fs::read_to_string(pin.value_path()).unwrap(), "0");
        assert!(!root.path().join("export").exists());
    }

    #[test]
    fn unexported_pin_is_requested_from_kernel() {
        let root = tempfile::tempdir().unwrap();
        // No kernel behind the fake tree, so the direction write fails after export.
        let err = SysfsPin::export(root.path(), 17).unwrap_err();
        assert_eq!(err.action, "set direction");
        assert_eq!(
            fs::read_to_string(root.path().join("export")).unwrap(),
            "17"
        );
    }

    #[test]
    fn dry_run_pin_tracks_level() {
        let mut pin = DryRunPin::new(4);
        assert!(!pin.high);
        pin.set_high().unwrap();
        assert!(pin.high);
        pin.set_low().unwrap();
        assert!(!pin.high);
    }
}
