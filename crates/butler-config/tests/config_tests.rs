// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Butler configuration system.

use butler_config::diagnostic::ConfigError;
use butler_config::model::{ButlerConfig, DoorBackend};
use butler_config::{
    load_and_validate_path, load_and_validate_str, load_config, load_config_from_str,
};
use figment::Jail;
use serial_test::serial;

/// Valid TOML with all known sections deserializes successfully.
#[test]
fn valid_toml_deserializes_into_butler_config() {
    let toml = r#"
[agent]
name = "garage"
log_level = "debug"

[twilio]
account_sid = "AC0123"
auth_token = "secret"
from_number = "+12145551212"
request_timeout_secs = 5

[owner]
phone_numbers = ["+14695551212"]
emails = ["owner@example.com"]

[storage]
database_path = "/var/lib/butler/ledger.db"
wal_mode = false

[door]
backend = "dry_run"
gpio_pin = 17
active_low = true
pulse_ms = 750

[camera]
enabled = true
upload_url = "https://uploads.example.com/garage"

[email]
enabled = true
smtp_host = "smtp.example.com"
smtp_port = 465
from_address = "garage@example.com"

[poll]
interval_secs = 3
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "garage");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.twilio.account_sid.as_deref(), Some("AC0123"));
    assert_eq!(config.twilio.auth_token.as_deref(), Some("secret"));
    assert_eq!(config.twilio.from_number.as_deref(), Some("+12145551212"));
    assert_eq!(config.twilio.request_timeout_secs, 5);
    assert_eq!(config.owner.phone_numbers, vec!["+14695551212"]);
    assert_eq!(config.owner.emails, vec!["owner@example.com"]);
    assert_eq!(config.storage.database_path, "/var/lib/butler/ledger.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.door.backend, DoorBackend::DryRun);
    assert_eq!(config.door.gpio_pin, 17);
    assert!(config.door.active_low);
    assert_eq!(config.door.pulse_ms, 750);
    assert!(config.camera.enabled);
    assert_eq!(
        config.camera.upload_url.as_deref(),
        Some("https://uploads.example.com/garage")
    );
    assert!(config.email.enabled);
    assert_eq!(config.email.smtp_port, 465);
    assert_eq!(config.poll.interval_secs, 3);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "butler");
    assert_eq!(config.agent.log_level, "info");
    assert!(config.twilio.account_sid.is_none());
    assert_eq!(config.twilio.api_base_url, "https://api.twilio.com");
    assert!(config.owner.phone_numbers.is_empty());
    assert!(config.storage.database_path.ends_with("butler.db"));
    assert!(config.storage.wal_mode);
    assert_eq!(config.door.backend, DoorBackend::Sysfs);
    assert_eq!(config.door.gpio_pin, 23);
    assert!(!config.door.active_low);
    assert_eq!(config.door.pulse_ms, 500);
    assert!(!config.camera.enabled);
    assert!(!config.email.enabled);
    assert_eq!(config.poll.interval_secs, 5);
}

/// Unknown field in [twilio] is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_twilio_produces_error() {
    let toml = r#"
[twilio]
auth_tokn = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("auth_tokn"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected.
#[test]
fn deny_unknown_fields_at_top_level() {
    let err = load_config_from_str("[gateway]\nport = 1\n")
        .expect_err("unknown top-level section should be rejected");
    assert!(format!("{err}").contains("gateway") || format!("{err}").contains("unknown field"));
}

/// Door backend only accepts the documented values.
#[test]
fn unknown_door_backend_is_rejected() {
    let toml = r#"
[door]
backend = "gpiod"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Unknown key produces an UnknownKey diagnostic with suggestion and span.
#[test]
fn diagnostic_unknown_key_suggests_and_points() {
    let toml = r#"
[door]
gpio_pni = 23
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key,
                suggestion,
                valid_keys,
                span,
                ..
            } => Some((key, suggestion, valid_keys, span)),
            _ => None,
        })
        .expect("should have an UnknownKey error");

    assert_eq!(unknown.0, "gpio_pni");
    assert_eq!(unknown.1.as_deref(), Some("gpio_pin"));
    assert!(unknown.2.contains("pulse_ms"));
    assert!(unknown.3.is_some(), "inline source should yield a span");
}

/// Invalid type is reported with the dotted key.
#[test]
fn diagnostic_invalid_type_names_key() {
    let toml = r#"
[poll]
interval_secs = "soon"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key.contains("interval_secs")
    )));
}

/// ConfigError renders through miette with code and help.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::MissingKey {
        key: "twilio.auth_token".to_string(),
    };
    assert!(error.code().is_some());
    assert!(error.help().unwrap().to_string().contains("BUTLER_"));

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("twilio.auth_token"));
}

/// Semantic validation runs after deserialization.
#[test]
fn validation_catches_held_line_pulse() {
    let toml = r#"
[door]
pulse_ms = 10001
"#;

    let errors = load_and_validate_str(toml).expect_err("long pulse should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("pulse_ms"))
    ));
}

/// Environment variables override files, with section-aware key mapping.
#[test]
fn env_vars_override_local_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "butler.toml",
            r#"
[twilio]
auth_token = "from-file"
from_number = "+12145551212"

[poll]
interval_secs = 9
"#,
        )?;
        jail.set_env("BUTLER_TWILIO_AUTH_TOKEN", "from-env");
        jail.set_env("BUTLER_DOOR_GPIO_PIN", "4");
        jail.set_env("BUTLER_OWNER_PHONE_NUMBERS", "[\"+14695551212\"]");

        let config: ButlerConfig = load_config()?;
        assert_eq!(config.twilio.auth_token.as_deref(), Some("from-env"));
        assert_eq!(config.twilio.from_number.as_deref(), Some("+12145551212"));
        assert_eq!(config.door.gpio_pin, 4);
        assert_eq!(config.owner.phone_numbers, vec!["+14695551212"]);
        assert_eq!(config.poll.interval_secs, 9);
        Ok(())
    });
}

/// An explicit `--config` path must exist.
#[test]
#[serial]
fn explicit_path_must_exist() {
    let errors = load_and_validate_path(std::path::Path::new("/nonexistent/butler.toml"))
        .expect_err("missing file should be reported");
    assert!(matches!(&errors[0], ConfigError::Other(msg) if msg.contains("does not exist")));
}

/// An explicit path is loaded and validated.
#[test]
#[serial]
fn explicit_path_loads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garage.toml");
    std::fs::write(&path, "[door]\nbackend = \"dry_run\"\npulse_ms = 300\n").unwrap();

    let config = load_and_validate_path(&path).expect("file should validate");
    assert_eq!(config.door.backend, DoorBackend::DryRun);
    assert_eq!(config.door.pulse_ms, 300);
}
