// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `butler config check`: print the effective configuration with secrets
//! masked.

use butler_config::ButlerConfig;

fn mask(value: &Option<String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "<set>",
        _ => "<unset>",
    }
}

fn or_unset(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<unset>")
}

/// Render the effective configuration, one `key = value` per line.
pub fn render(config: &ButlerConfig) -> Vec<String> {
    let mut lines = vec![
        format!("agent.name = {}", config.agent.name),
        format!("agent.log_level = {}", config.agent.log_level),
        format!("twilio.account_sid = {}", or_unset(&config.twilio.account_sid)),
        format!("twilio.auth_token = {}", mask(&config.twilio.auth_token)),
        format!("twilio.from_number = {}", or_unset(&config.twilio.from_number)),
        format!("twilio.api_base_url = {}", config.twilio.api_base_url),
        format!("owner.phone_numbers = {:?}", config.owner.phone_numbers),
        format!("owner.emails = {:?}", config.owner.emails),
        format!("storage.database_path = {}", config.storage.database_path),
        format!("storage.wal_mode = {}", config.storage.wal_mode),
        format!("door.backend = {:?}", config.door.backend),
        format!("door.gpio_pin = {}", config.door.gpio_pin),
        format!("door.active_low = {}", config.door.active_low),
        format!("door.pulse_ms = {}", config.door.pulse_ms),
        format!("camera.enabled = {}", config.camera.enabled),
        format!("email.enabled = {}", config.email.enabled),
        format!("poll.interval_secs = {}", config.poll.interval_secs),
    ];

    if config.camera.enabled {
        lines.push(format!("camera.output_dir = {}", config.camera.output_dir));
        lines.push(format!("camera.upload_url = {}", or_unset(&config.camera.upload_url)));
        lines.push(format!("camera.upload_token = {}", mask(&config.camera.upload_token)));
    }
    if config.email.enabled {
        lines.push(format!("email.smtp_host = {}", or_unset(&config.email.smtp_host)));
        lines.push(format!("email.smtp_port = {}", config.email.smtp_port));
        lines.push(format!("email.password = {}", mask(&config.email.password)));
    }
    lines
}

pub fn print_effective(config: &ButlerConfig) {
    println!("configuration is valid");
    for line in render(config) {
        println!("  {line}");
    }
    if let Err(errors) = butler_config::require_runtime_settings(config) {
        println!();
        println!("  `butler serve` would refuse to start:");
        for error in errors {
            println!("    - {error}");
        }
    }
}
