// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMS command vocabulary.

use strum::{Display, EnumString};

/// A recognized command.
///
/// Matching is case-insensitive on the whole trimmed body; `close` is an
/// alias of `open` because the relay only toggles the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Command {
    Kill,
    Disable,
    Enable,
    Status,
    #[strum(to_string = "open", serialize = "close")]
    Open,
}

/// Classify a message body. Unrecognized bodies yield `None`.
pub fn classify(body: &str) -> Option<Command> {
    body.trim().parse().ok()
}
