// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Butler garage daemon.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Butler configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values; credentials have no
/// defaults and are checked by validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ButlerConfig {
    /// Daemon behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Twilio SMS transport settings.
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// Homeowner contact settings.
    #[serde(default)]
    pub owner: OwnerConfig,

    /// Ledger database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Door relay settings.
    #[serde(default)]
    pub door: DoorConfig,

    /// Evidence camera settings.
    #[serde(default)]
    pub camera: CameraConfig,

    /// SMTP owner alert settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// Polling settings.
    #[serde(default)]
    pub poll: PollConfig,
}

/// Daemon behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in owner alert subjects.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "butler".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Twilio REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    /// Account SID (`AC...`). Required to run the daemon.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Auth token paired with the account SID.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// The purchased Twilio number used as the sender of every outbound SMS.
    #[serde(default)]
    pub from_number: Option<String>,

    /// Base URL of the REST API. Overridable for testing.
    #[serde(default = "default_twilio_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base_url: default_twilio_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_twilio_api_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

/// Homeowner contact configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OwnerConfig {
    /// Phone numbers that receive owner alerts by SMS.
    #[serde(default)]
    pub phone_numbers: Vec<String>,

    /// Email addresses that receive owner alerts when `[email]` is enabled.
    #[serde(default)]
    pub emails: Vec<String>,
}

/// Ledger database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("butler").join("butler.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("butler.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// How the door relay line is driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorBackend {
    /// Linux sysfs GPIO (`/sys/class/gpio`).
    #[default]
    Sysfs,
    /// Log pulses without touching hardware.
    DryRun,
}

/// Door relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DoorConfig {
    /// Relay driver backend.
    #[serde(default)]
    pub backend: DoorBackend,

    /// BCM GPIO number wired to the relay.
    #[serde(default = "default_gpio_pin")]
    pub gpio_pin: u32,

    /// Relay boards that energise on a low level need this set.
    #[serde(default)]
    pub active_low: bool,

    /// How long the relay is held closed for one trigger, in milliseconds.
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,

    /// Root of the sysfs GPIO tree.
    #[serde(default = "default_gpio_root")]
    pub gpio_root: String,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            backend: DoorBackend::default(),
            gpio_pin: default_gpio_pin(),
            active_low: false,
            pulse_ms: default_pulse_ms(),
            gpio_root: default_gpio_root(),
        }
    }
}

fn default_gpio_pin() -> u32 {
    23
}

fn default_pulse_ms() -> u64 {
    500
}

fn default_gpio_root() -> String {
    "/sys/class/gpio".to_string()
}

/// Evidence camera configuration.
///
/// Capture commands are run through `sh -c` with `{output}` replaced by the
/// destination file path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    /// Enable still/clip capture.
    #[serde(default)]
    pub enabled: bool,

    /// Command that writes a still image to `{output}`.
    #[serde(default = "default_still_command")]
    pub still_command: String,

    /// Command that writes a short video clip to `{output}`.
    #[serde(default = "default_clip_command")]
    pub clip_command: String,

    /// Directory captures are written to before upload.
    #[serde(default = "default_capture_dir")]
    pub output_dir: String,

    /// HTTP endpoint captures are PUT to. `None` keeps captures local.
    #[serde(default)]
    pub upload_url: Option<String>,

    /// Bearer token sent with uploads.
    #[serde(default)]
    pub upload_token: Option<String>,

    /// Upper bound for one capture command, in seconds.
    #[serde(default = "default_capture_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            still_command: default_still_command(),
            clip_command: default_clip_command(),
            output_dir: default_capture_dir(),
            upload_url: None,
            upload_token: None,
            timeout_secs: default_capture_timeout_secs(),
        }
    }
}

fn default_still_command() -> String {
    "raspistill -n -w 1280 -h 720 -o {output}".to_string()
}

fn default_clip_command() -> String {
    "raspivid -n -t 10000 -w 1280 -h 720 -o {output}".to_string()
}

fn default_capture_dir() -> String {
    std::env::temp_dir()
        .join("butler-captures")
        .to_string_lossy()
        .into_owned()
}

fn default_capture_timeout_secs() -> u64 {
    30
}

/// SMTP owner alert configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    /// Mirror owner alerts to `owner.emails`.
    #[serde(default)]
    pub enabled: bool,

    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP submission port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,

    /// `From:` address of alert emails.
    #[serde(default)]
    pub from_address: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            from_address: None,
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

/// Polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Seconds slept between two polls of the message source.
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}
