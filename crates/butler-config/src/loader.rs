// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./butler.toml` > `~/.config/butler/butler.toml` > `/etc/butler/butler.toml`
//! with environment variable overrides via `BUTLER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ButlerConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/butler/butler.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "butler.toml";

/// Sections recognised by the environment provider, in mapping order.
const ENV_SECTIONS: &[&str] = &[
    "agent", "twilio", "owner", "storage", "door", "camera", "email", "poll",
];

/// Returns the per-user configuration file path, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("butler").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/butler/butler.toml` (system-wide)
/// 3. `~/.config/butler/butler.toml` (user XDG config)
/// 4. `./butler.toml` (local directory)
/// 5. `BUTLER_*` environment variables
pub fn load_config() -> Result<ButlerConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ButlerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ButlerConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ButlerConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ButlerConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment used by [`load_config`].
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ButlerConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider.
///
/// Uses `Env::map()` NOT `Env::split("_")`: `BUTLER_TWILIO_AUTH_TOKEN` must
/// map to `twilio.auth_token`, not `twilio.auth.token`.
fn env_provider() -> Env {
    Env::prefixed("BUTLER_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env key to its dotted config path.
///
/// Figment hands over the key in its original case.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}
