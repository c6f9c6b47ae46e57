// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The poll loop: fetch, dispatch, sleep, until something ends the process.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use butler_core::{Actuator, ButlerError, MessageSource, NotificationSink, PhoneNumber};

use crate::dispatcher::{CommandDispatcher, DispatchOutcome};

/// Why the daemon stopped. Each reason maps to a distinct exit status.
#[derive(Debug)]
pub enum ExitReason {
    /// Fetching or dispatching failed mid-run.
    Runtime(ButlerError),
    /// Configuration, ledger or hardware could not be brought up.
    Startup(ButlerError),
    /// An authorized sender sent `kill`.
    Killed { by: PhoneNumber },
    /// SIGINT or SIGTERM.
    Interrupted,
}

impl ExitReason {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Runtime(_) => 1,
            Self::Startup(_) => 2,
            Self::Killed { .. } => 3,
            Self::Interrupted => 4,
        }
    }
}

/// Drives a [`CommandDispatcher`] on a fixed interval.
pub struct PollLoop {
    source: Arc<dyn MessageSource>,
    dispatcher: CommandDispatcher,
    actuator: Arc<dyn Actuator>,
    notifier: Arc<dyn NotificationSink>,
    interval: Duration,
}

impl PollLoop {
    pub fn new(
        source: Arc<dyn MessageSource>,
        dispatcher: CommandDispatcher,
        actuator: Arc<dyn Actuator>,
        notifier: Arc<dyn NotificationSink>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            dispatcher,
            actuator,
            notifier,
            interval,
        }
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Run until a kill, an interrupt or an iteration failure.
    ///
    /// `cancel` is only observed between iterations; a batch in flight is
    /// always finished. The actuator is released on every exit path.
    pub async fn run(&mut self, cancel: CancellationToken) -> ExitReason {
        info!(interval_secs = self.interval.as_secs_f64(), "poll loop running");

        let reason = loop {
            match self.iterate().await {
                Ok(DispatchOutcome::Continue { handled }) => {
                    if handled > 0 {
                        info!(handled, "batch processed");
                    }
                }
                Ok(DispatchOutcome::Kill { by }) => {
                    warn!(sender = %by, "kill command received, exiting");
                    break ExitReason::Killed { by };
                }
                Err(e) => {
                    error!(error = %e, "poll iteration failed, bailing");
                    self.owner_alert(
                        "Garage butler stopped",
                        &format!("Garage butler hit an error and is bailing: {e}"),
                    )
                    .await;
                    break ExitReason::Runtime(e);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping poll loop");
                    self.owner_alert(
                        "Garage butler shut down",
                        "Garage butler received an interrupt and is shutting down intentionally",
                    )
                    .await;
                    break ExitReason::Interrupted;
                }
            }
        };

        if let Err(e) = self.actuator.release_safe().await {
            error!(error = %e, "failed to release relay");
        }
        info!(code = reason.exit_code(), "poll loop stopped");
        reason
    }

    async fn iterate(&mut self) -> Result<DispatchOutcome, ButlerError> {
        let today = Utc::now().date_naive();
        let batch = self.source.list_messages(today).await?;
        Ok(self.dispatcher.dispatch(&batch).await)
    }

    async fn owner_alert(&self, subject: &str, body: &str) {
        if let Err(e) = self.notifier.notify_owner(subject, body).await {
            warn!(error = %e, "owner alert failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let reasons = [
            ExitReason::Runtime(ButlerError::Internal("x".into())),
            ExitReason::Startup(ButlerError::Config("x".into())),
            ExitReason::Killed {
                by: PhoneNumber::new("+1"),
            },
            ExitReason::Interrupted,
        ];
        let codes: Vec<_> = reasons.iter().map(ExitReason::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4]);
    }
}
