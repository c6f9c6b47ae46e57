// SPDX-FileCopyrightText: 2026 Butler Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Butler - SMS-controlled garage door daemon.
//!
//! This is the binary entry point. Exit statuses: 1 runtime failure,
//! 2 startup failure, 3 remote kill, 4 interrupt.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod authorized;
mod config_check;
mod doctor;
mod serve;

use std::path::{Path, PathBuf};

use butler_config::{ButlerConfig, ConfigError};
use clap::{Parser, Subcommand};

/// Exit status for configuration and other startup failures.
const EXIT_STARTUP: i32 = 2;

/// Butler - SMS-controlled garage door daemon.
#[derive(Parser, Debug)]
#[command(name = "butler", version, about, long_about = None)]
struct Cli {
    /// Load this file (plus BUTLER_* overrides) instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Poll for SMS commands and drive the door (default).
    Serve,
    /// Manage the phone numbers allowed to send commands.
    Authorized {
        #[command(subcommand)]
        action: AuthorizedCommands,
    },
    /// Check configuration, ledger, Twilio, door and mail health.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum AuthorizedCommands {
    /// Authorize a phone number.
    Add {
        phone: String,
        /// Free-form note, usually the person's name.
        #[arg(long)]
        label: Option<String>,
    },
    /// Revoke a phone number.
    Remove { phone: String },
    /// List authorized phone numbers.
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate configuration and print effective non-secret values.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            butler_config::render_errors(&errors);
            std::process::exit(EXIT_STARTUP);
        }
    };

    let code = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            init_tracing(&config.agent.log_level);
            serve::run_serve(config).await.exit_code()
        }
        Commands::Authorized { action } => {
            let result = match action {
                AuthorizedCommands::Add { phone, label } => {
                    authorized::add(&config, &phone, label.as_deref()).await
                }
                AuthorizedCommands::Remove { phone } => authorized::remove(&config, &phone).await,
                AuthorizedCommands::List => authorized::list(&config).await,
            };
            match result {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("error: {e}");
                    1
                }
            }
        }
        Commands::Doctor { plain } => {
            if doctor::run_doctor(&config, plain).await {
                0
            } else {
                1
            }
        }
        Commands::Config {
            action: ConfigCommands::Check,
        } => {
            config_check::print_effective(&config);
            0
        }
    };

    std::process::exit(code);
}

fn load_config(path: Option<&Path>) -> Result<ButlerConfig, Vec<ConfigError>> {
    match path {
        Some(path) => butler_config::load_and_validate_path(path),
        None => butler_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("butler={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["butler"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_config_flag_follows_subcommands() {
        let cli = Cli::try_parse_from([
            "butler",
            "authorized",
            "add",
            "+14695551212",
            "--label",
            "Alice",
            "--config",
            "/tmp/butler.toml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/butler.toml")));
        match cli.command {
            Some(Commands::Authorized {
                action: AuthorizedCommands::Add { phone, label },
            }) => {
                assert_eq!(phone, "+14695551212");
                assert_eq!(label.as_deref(), Some("Alice"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
