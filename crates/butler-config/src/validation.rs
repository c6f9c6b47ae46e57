// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as sane pulse lengths, non-empty paths, and well-formed phone numbers.

use butler_core::PhoneNumber;

use crate::diagnostic::ConfigError;
use crate::model::ButlerConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Shortest relay pulse a door opener reliably registers.
const MIN_PULSE_MS: u64 = 50;

/// Longest relay pulse; anything above this is a held line, not a pulse.
const MAX_PULSE_MS: u64 = 10_000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ButlerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.poll.interval_secs == 0 {
        fail("poll.interval_secs must be at least 1".to_string());
    }

    if !(MIN_PULSE_MS..=MAX_PULSE_MS).contains(&config.door.pulse_ms) {
        fail(format!(
            "door.pulse_ms must be between {MIN_PULSE_MS} and {MAX_PULSE_MS}, got {}",
            config.door.pulse_ms
        ));
    }

    if config.door.gpio_root.trim().is_empty() {
        fail("door.gpio_root must not be empty".to_string());
    }

    let base = config.twilio.api_base_url.as_str();
    if !(base.starts_with("https://") || base.starts_with("http://")) {
        fail(format!("twilio.api_base_url `{base}` must be an http(s) URL"));
    }

    if let Some(from) = &config.twilio.from_number
        && PhoneNumber::new(from).is_empty()
    {
        fail("twilio.from_number must not be empty".to_string());
    }

    for (i, raw) in config.owner.phone_numbers.iter().enumerate() {
        if PhoneNumber::new(raw).is_empty() {
            fail(format!("owner.phone_numbers[{i}] must not be empty"));
        }
    }

    if config.camera.enabled {
        for (key, command) in [
            ("camera.still_command", &config.camera.still_command),
            ("camera.clip_command", &config.camera.clip_command),
        ] {
            if !command.contains("{output}") {
                fail(format!("{key} must contain the `{{output}}` placeholder"));
            }
        }
        if config.camera.timeout_secs == 0 {
            fail("camera.timeout_secs must be at least 1".to_string());
        }
    }

    if config.email.enabled {
        if config.email.smtp_host.as_deref().is_none_or(str::is_empty) {
            fail("email.smtp_host is required when email.enabled = true".to_string());
        }
        match config.email.from_address.as_deref() {
            Some(addr) if addr.contains('@') => {}
            _ => fail("email.from_address must be an email address".to_string()),
        }
        if config.owner.emails.is_empty() {
            fail("owner.emails must list at least one address when email is enabled".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check the settings the daemon cannot run without.
///
/// Kept apart from [`validate_config`] so that a default configuration is
/// valid for offline commands such as `butler authorized list`.
pub fn require_runtime_settings(config: &ButlerConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, value) in [
        ("twilio.account_sid", &config.twilio.account_sid),
        ("twilio.auth_token", &config.twilio.auth_token),
        ("twilio.from_number", &config.twilio.from_number),
    ] {
        if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
            errors.push(ConfigError::MissingKey {
                key: key.to_string(),
            });
        }
    }

    if config.owner.phone_numbers.is_empty() {
        errors.push(ConfigError::MissingKey {
            key: "owner.phone_numbers".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DoorBackend;

    fn has_validation(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ButlerConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = ButlerConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "database_path"));
    }

    #[test]
    fn zero_poll_interval_fails_validation() {
        let mut config = ButlerConfig::default();
        config.poll.interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "poll.interval_secs"));
    }

    #[test]
    fn held_line_pulse_is_rejected() {
        let mut config = ButlerConfig::default();
        config.door.pulse_ms = 30_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "door.pulse_ms"));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = ButlerConfig::default();
        config.agent.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "agent.log_level"));
    }

    #[test]
    fn camera_commands_need_output_placeholder() {
        let mut config = ButlerConfig::default();
        config.camera.enabled = true;
        config.camera.still_command = "raspistill -o /tmp/x.jpg".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "camera.still_command"));
        assert!(!has_validation(&errors, "camera.clip_command"));
    }

    #[test]
    fn enabled_email_requires_host_sender_and_recipients() {
        let mut config = ButlerConfig::default();
        config.email.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_validation(&errors, "email.smtp_host"));
        assert!(has_validation(&errors, "email.from_address"));
        assert!(has_validation(&errors, "owner.emails"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = ButlerConfig::default();
        config.storage.database_path = String::new();
        config.poll.interval_secs = 0;
        config.door.pulse_ms = 1;
        assert_eq!(validate_config(&config).unwrap_err().len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = ButlerConfig::default();
        config.door.backend = DoorBackend::DryRun;
        config.owner.phone_numbers = vec!["+1 469 555 1212".to_string()];
        config.email.enabled = true;
        config.email.smtp_host = Some("smtp.example.com".to_string());
        config.email.from_address = Some("garage@example.com".to_string());
        config.owner.emails = vec!["owner@example.com".to_string()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn runtime_settings_report_each_missing_credential() {
        let errors = require_runtime_settings(&ButlerConfig::default()).unwrap_err();
        let keys: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ConfigError::MissingKey { key } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                "twilio.account_sid",
                "twilio.auth_token",
                "twilio.from_number",
                "owner.phone_numbers"
            ]
        );
    }

    #[test]
    fn runtime_settings_pass_when_complete() {
        let mut config = ButlerConfig::default();
        config.twilio.account_sid = Some("AC123".to_string());
        config.twilio.auth_token = Some("token".to_string());
        config.twilio.from_number = Some("+12145551212".to_string());
        config.owner.phone_numbers = vec!["+14695551212".to_string()];
        assert!(require_runtime_settings(&config).is_ok());
    }
}
