// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory service state owned by the dispatcher.

use chrono::{DateTime, Utc};

use butler_core::PhoneNumber;

/// Human-readable timestamp used in replies.
pub(crate) fn stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Enabled flag, last opening summary and opening counter.
///
/// Lives for the process lifetime only; a restart re-enables the door and
/// resets the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceState {
    enabled: bool,
    last_action_summary: String,
    opening_count: u64,
}

impl ServiceState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            enabled: true,
            last_action_summary: format!(
                "Startup sequence initiated at {}. No open requests, yet",
                stamp(started_at)
            ),
            opening_count: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn last_action_summary(&self) -> &str {
        &self.last_action_summary
    }

    pub fn opening_count(&self) -> u64 {
        self.opening_count
    }

    /// Count an opening and remember who asked for it.
    pub fn record_opening(&mut self, by: &PhoneNumber, at: DateTime<Utc>) {
        self.opening_count += 1;
        self.last_action_summary = format!("Garage door last opened by {by} on {}", stamp(at));
    }

    /// Body of the reply to a `status` command.
    pub fn status_reply(&self) -> String {
        if self.enabled {
            format!("ENABLED. Status reply: {}", self.last_action_summary)
        } else {
            format!("SERVICE DISABLED! Status reply: {}", self.last_action_summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 7, 30, 0).unwrap()
    }

    #[test]
    fn starts_enabled_with_placeholder_summary() {
        let state = ServiceState::new(t0());
        assert!(state.is_enabled());
        assert_eq!(state.opening_count(), 0);
        assert_eq!(
            state.last_action_summary(),
            "Startup sequence initiated at 2026-10-19 07:30:00 UTC. No open requests, yet"
        );
    }

    #[test]
    fn opening_updates_summary_and_count() {
        let mut state = ServiceState::new(t0());
        state.record_opening(&PhoneNumber::new("+14695551212"), t0());
        state.record_opening(&PhoneNumber::new("+14695551212"), t0());
        assert_eq!(state.opening_count(), 2);
        assert_eq!(
            state.last_action_summary(),
            "Garage door last opened by +14695551212 on 2026-10-19 07:30:00 UTC"
        );
    }

    #[test]
    fn status_reply_reflects_enabled_flag() {
        let mut state = ServiceState::new(t0());
        assert!(state.status_reply().starts_with("ENABLED. Status reply: Startup"));
        state.set_enabled(false);
        assert!(state.status_reply().starts_with("SERVICE DISABLED! Status reply: Startup"));
    }
}
