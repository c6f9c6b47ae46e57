// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command dispatch and polling for the Butler garage daemon.
//!
//! The [`PollLoop`] is the central coordinator that:
//! - Fetches the day's messages from the message source
//! - Hands each batch to the [`CommandDispatcher`] (dedup, ACL, commands)
//! - Alerts the owner and releases the relay on every exit path
//! - Maps the reason it stopped to a process exit status

pub mod command;
pub mod dispatcher;
pub mod notifier;
pub mod poll;
pub mod shutdown;
pub mod state;

pub use command::{Command, classify};
pub use dispatcher::{CommandDispatcher, DispatchOutcome};
pub use notifier::OwnerNotifier;
pub use poll::{ExitReason, PollLoop};
pub use shutdown::{StopSignal, install_signal_handler};
pub use state::ServiceState;
