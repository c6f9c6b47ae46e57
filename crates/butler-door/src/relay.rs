// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Door relay driven by a single output pin.
//!
//! A trigger is a brief pulse: the line goes to its active level for the
//! configured duration and then back to the released level. The pulse runs
//! on a blocking thread so dropping the caller's future cannot leave the
//! line held.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use butler_core::ButlerError;
use embedded_hal::digital::{Error as _, OutputPin};
use tracing::{info, warn};

/// A relay wired to one GPIO line.
pub struct Relay<P> {
    pin: Arc<Mutex<P>>,
    active_low: bool,
    pulse: Duration,
}

impl<P> Relay<P>
where
    P: OutputPin + Send + 'static,
{
    /// Wrap `pin` and drive it to the released level immediately.
    pub fn new(mut pin: P, active_low: bool, pulse: Duration) -> Result<Self, ButlerError> {
        drive(&mut pin, active_low, false)?;
        Ok(Self {
            pin: Arc::new(Mutex::new(pin)),
            active_low,
            pulse,
        })
    }

    /// Close the relay for the pulse duration, then release it.
    ///
    /// The release is attempted even if engaging the line failed.
    pub async fn pulse(&self) -> Result<(), ButlerError> {
        let pin = Arc::clone(&self.pin);
        let active_low = self.active_low;
        let pulse = self.pulse;

        tokio::task::spawn_blocking(move || -> Result<(), ButlerError> {
            let mut pin = pin.lock().map_err(|_| poisoned())?;
            let engaged = drive(&mut *pin, active_low, true);
            if engaged.is_ok() {
                std::thread::sleep(pulse);
            }
            let released = drive(&mut *pin, active_low, false);
            engaged.and(released)
        })
        .await
        .map_err(|e| ButlerError::Internal(format!("relay pulse task failed: {e}")))??;

        info!(pulse_ms = self.pulse.as_millis() as u64, "relay pulsed");
        Ok(())
    }

    /// Drive the line to the released level.
    pub async fn release(&self) -> Result<(), ButlerError> {
        let pin = Arc::clone(&self.pin);
        let active_low = self.active_low;

        tokio::task::spawn_blocking(move || -> Result<(), ButlerError> {
            let mut pin = pin.lock().map_err(|_| poisoned())?;
            drive(&mut *pin, active_low, false)
        })
        .await
        .map_err(|e| ButlerError::Internal(format!("relay release task failed: {e}")))?
    }
}

/// Set the electrical level for the logical state `engaged`.
fn drive<P: OutputPin>(pin: &mut P, active_low: bool, engaged: bool) -> Result<(), ButlerError> {
    let high = engaged != active_low;
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|e| {
        warn!(engaged, kind = ?e.kind(), "relay write failed");
        ButlerError::Actuator {
            message: format!("relay write failed ({:?}): {e:?}", e.kind()),
            source: None,
        }
    })
}

fn poisoned() -> ButlerError {
    ButlerError::Actuator {
        message: "relay pin lock poisoned".into(),
        source: None,
    }
}
