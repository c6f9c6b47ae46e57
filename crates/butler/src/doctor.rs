// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `butler doctor` command implementation.
//!
//! Runs each adapter's health check against the loaded configuration and
//! prints one line per check.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use butler_config::ButlerConfig;
use butler_core::{ButlerError, HealthStatus, PluginAdapter};
use butler_door::build_actuator;
use butler_email::SmtpMailer;
use butler_sms::TwilioSource;
use butler_storage::SqliteLedger;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn from_health(
        name: &'static str,
        start: Instant,
        health: Result<HealthStatus, ButlerError>,
        ok_message: String,
    ) -> Self {
        let (status, message) = match health {
            Ok(HealthStatus::Healthy) => (CheckStatus::Pass, ok_message),
            Ok(HealthStatus::Degraded(msg)) => (CheckStatus::Warn, msg),
            Ok(HealthStatus::Unhealthy(msg)) => (CheckStatus::Fail, msg),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        };
        Self {
            name,
            status,
            message,
            duration: start.elapsed(),
        }
    }

    fn failed(name: &'static str, start: Instant, error: ButlerError) -> Self {
        Self {
            name,
            status: CheckStatus::Fail,
            message: error.to_string(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `butler doctor` command. Returns `true` when nothing failed.
pub async fn run_doctor(config: &ButlerConfig, plain: bool) -> bool {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = run_checks(config).await;

    println!();
    println!("  butler doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", format_line(result, use_color));
    }
    println!();

    let failed = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let warned = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warn)
        .count();

    if failed + warned == 0 {
        println!("  All checks passed.");
    } else {
        let issues = failed + warned;
        let word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {word} found.");
    }
    println!();

    failed == 0
}

/// Run every check in a fixed order.
pub async fn run_checks(config: &ButlerConfig) -> Vec<CheckResult> {
    vec![
        check_runtime_settings(config),
        check_ledger(config).await,
        check_twilio(config).await,
        check_door(config).await,
        check_email(config).await,
    ]
}

fn format_line(result: &CheckResult, use_color: bool) -> String {
    let ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!("    {symbol} {:<20} {message} ({ms}ms)", result.name)
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!("    {tag} {:<20} {} ({ms}ms)", result.name, result.message)
    }
}

fn check_runtime_settings(config: &ButlerConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match butler_config::require_runtime_settings(config) {
        Ok(()) => (CheckStatus::Pass, "valid".to_string()),
        Err(errors) => (
            CheckStatus::Fail,
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        ),
    };
    CheckResult {
        name: "Configuration",
        status,
        message,
        duration: start.elapsed(),
    }
}

async fn check_ledger(config: &ButlerConfig) -> CheckResult {
    let start = Instant::now();
    let ledger = SqliteLedger::new(config.storage.clone());
    if let Err(e) = ledger.initialize().await {
        return CheckResult::failed("Ledger", start, e);
    }

    let summary = match (ledger.list_authorized().await, ledger.processed_count().await) {
        (Ok(authorized), Ok(processed)) => format!(
            "{} authorized, {processed} processed ({})",
            authorized.len(),
            ledger.database_path()
        ),
        (Err(e), _) | (_, Err(e)) => return CheckResult::failed("Ledger", start, e),
    };

    let mut result =
        CheckResult::from_health("Ledger", start, ledger.health_check().await, summary);
    if result.status == CheckStatus::Pass && result.message.starts_with("0 authorized") {
        result.status = CheckStatus::Warn;
        result.message = format!("{}; add one with `butler authorized add`", result.message);
    }
    let _ = ledger.shutdown().await;
    result
}

async fn check_twilio(config: &ButlerConfig) -> CheckResult {
    let start = Instant::now();
    let source = match TwilioSource::new(&config.twilio) {
        Ok(source) => source,
        Err(e) => return CheckResult::failed("Twilio", start, e),
    };
    let ok = format!("credentials accepted, sending as {}", source.from_number());
    CheckResult::from_health("Twilio", start, source.health_check().await, ok)
}

async fn check_door(config: &ButlerConfig) -> CheckResult {
    let start = Instant::now();
    let actuator = match build_actuator(&config.door, &config.camera) {
        Ok(actuator) => actuator,
        Err(e) => return CheckResult::failed("Door", start, e),
    };
    let ok = format!("{} ready on pin {}", actuator.name(), config.door.gpio_pin);
    CheckResult::from_health("Door", start, actuator.health_check().await, ok)
}

async fn check_email(config: &ButlerConfig) -> CheckResult {
    let start = Instant::now();
    if !config.email.enabled {
        return CheckResult {
            name: "Email",
            status: CheckStatus::Pass,
            message: "disabled".to_string(),
            duration: start.elapsed(),
        };
    }
    let mailer = match SmtpMailer::new(&config.email) {
        Ok(mailer) => mailer,
        Err(e) => return CheckResult::failed("Email", start, e),
    };
    CheckResult::from_health(
        "Email",
        start,
        mailer.health_check().await,
        "smtp server reachable".to_string(),
    )
}
