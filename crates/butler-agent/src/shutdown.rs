// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stop signals for the daemon.
//!
//! SIGINT and SIGTERM both cancel a [`CancellationToken`]. The poll loop only
//! looks at it while sleeping, so a batch in flight still completes.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Which signal asked the daemon to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum StopSignal {
    #[strum(serialize = "SIGINT")]
    Interrupt,
    #[strum(serialize = "SIGTERM")]
    Terminate,
}

/// Resolve on the first SIGINT or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires, so the
/// daemon keeps running on whichever signal is still available.
pub async fn wait_for_stop_signal() -> StopSignal {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for SIGINT");
            std::future::pending::<()>().await;
        }
        StopSignal::Interrupt
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let terminate = async {
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "cannot listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
            StopSignal::Terminate
        };

        tokio::select! {
            sig = interrupt => sig,
            sig = terminate => sig,
        }
    }

    #[cfg(not(unix))]
    {
        interrupt.await
    }
}

/// Return a token that is cancelled once `signal` resolves.
pub fn cancel_on<F>(signal: F) -> CancellationToken
where
    F: Future<Output = StopSignal> + Send + 'static,
{
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let sig = signal.await;
        info!(signal = %sig, "stop requested; finishing current batch");
        trigger.cancel();
    });

    token
}

/// Cancel the returned token on SIGINT or SIGTERM.
pub fn install_signal_handler() -> CancellationToken {
    cancel_on(wait_for_stop_signal())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn token_is_cancelled_when_signal_arrives() {
        let token = cancel_on(async { StopSignal::Terminate });
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("token should be cancelled");
    }

    #[tokio::test]
    async fn token_stays_live_without_a_signal() {
        let token = cancel_on(std::future::pending());
        tokio::task::yield_now().await;
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn installed_handler_starts_live() {
        assert!(!install_signal_handler().is_cancelled());
    }

    #[test]
    fn signal_names() {
        assert_eq!(StopSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(StopSignal::Terminate.to_string(), "SIGTERM");
    }
}
