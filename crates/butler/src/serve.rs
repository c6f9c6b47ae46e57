// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `butler serve` command implementation.
//!
//! Brings up the ledger, the Twilio source, optional mail and the door
//! actuator, loads the dispatcher and hands control to the poll loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use butler_agent::{CommandDispatcher, ExitReason, OwnerNotifier, PollLoop, shutdown};
use butler_config::ButlerConfig;
use butler_core::{
    Actuator, ButlerError, LedgerAdapter, MailTransport, MessageSource, NotificationSink,
    PhoneNumber, PluginAdapter,
};
use butler_door::build_actuator;
use butler_email::SmtpMailer;
use butler_sms::TwilioSource;
use butler_storage::SqliteLedger;
use tracing::{error, info, warn};

/// Runs the daemon until it stops and reports why.
pub async fn run_serve(config: ButlerConfig) -> ExitReason {
    info!(name = %config.agent.name, "starting butler serve");
    let cancel = shutdown::install_signal_handler();

    if let Err(errors) = butler_config::require_runtime_settings(&config) {
        butler_config::render_errors(&errors);
        return ExitReason::Startup(ButlerError::Config(format!(
            "{} required setting(s) missing",
            errors.len()
        )));
    }

    let actuator = match build_actuator(&config.door, &config.camera) {
        Ok(actuator) => actuator,
        Err(e) => {
            error!(error = %e, "door actuator unavailable");
            return ExitReason::Startup(e);
        }
    };

    let started = unless_stopped(cancel.cancelled(), async {
        actuator.ensure_healthy().await?;
        wire(&config, Arc::clone(&actuator)).await
    })
    .await;

    let (mut poll, ledger) = match started {
        Some(Ok(wired)) => wired,
        Some(Err(e)) => {
            error!(error = %e, "startup failed");
            release_after_startup(actuator.as_ref()).await;
            return ExitReason::Startup(e);
        }
        None => {
            info!("stop signal received during startup");
            release_after_startup(actuator.as_ref()).await;
            return ExitReason::Interrupted;
        }
    };

    let reason = poll.run(cancel).await;

    if let Err(e) = ledger.shutdown().await {
        warn!(error = %e, "ledger shutdown failed");
    }
    info!(code = reason.exit_code(), "butler serve stopped");
    reason
}

/// Run `work` unless `stop` resolves first. `None` means it was stopped.
async fn unless_stopped<T>(
    stop: impl Future<Output = ()>,
    work: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        biased;
        () = stop => None,
        out = work => Some(out),
    }
}

async fn release_after_startup(actuator: &dyn Actuator) {
    if let Err(e) = actuator.release_safe().await {
        warn!(error = %e, "failed to release relay after startup failure");
    }
}

async fn wire(
    config: &ButlerConfig,
    actuator: Arc<dyn Actuator>,
) -> Result<(PollLoop, Arc<SqliteLedger>), ButlerError> {
    let ledger = Arc::new(SqliteLedger::new(config.storage.clone()));
    ledger.initialize().await?;

    let twilio = TwilioSource::new(&config.twilio)?;
    let from = twilio.from_number().clone();
    let source: Arc<dyn MessageSource> = Arc::new(twilio);

    let owners = config
        .owner
        .phone_numbers
        .iter()
        .map(|raw| PhoneNumber::new(raw))
        .collect();
    let mut notifier = OwnerNotifier::new(Arc::clone(&source), from, owners);
    if config.email.enabled {
        let mailer: Arc<dyn MailTransport> = Arc::new(SmtpMailer::new(&config.email)?);
        notifier = notifier.with_mail(mailer, config.owner.emails.clone());
        info!(recipients = config.owner.emails.len(), "email owner alerts enabled");
    }
    let notifier: Arc<dyn NotificationSink> = Arc::new(notifier);

    let dispatcher = CommandDispatcher::load(
        Arc::clone(&ledger) as Arc<dyn LedgerAdapter>,
        Arc::clone(&actuator),
        Arc::clone(&notifier),
    )
    .await?;

    let poll = PollLoop::new(
        source,
        dispatcher,
        actuator,
        notifier,
        Duration::from_secs(config.poll.interval_secs),
    );
    Ok((poll, ledger))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, ready};

    #[tokio::test]
    async fn stop_during_startup_abandons_the_work() {
        let out = unless_stopped(ready(()), pending::<()>()).await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn stop_wins_when_both_are_ready() {
        let out = unless_stopped(ready(()), ready(7)).await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn work_completes_without_a_stop() {
        let out = unless_stopped(pending(), async { 7 }).await;
        assert_eq!(out, Some(7));
    }
}
