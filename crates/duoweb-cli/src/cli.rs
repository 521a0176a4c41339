//! CLI argument parsing and logging setup

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// duoweb - sign and verify Duo Web handshake tokens
#[derive(Parser, Debug)]
#[command(
    name = "duoweb",
    version,
    about = "Sign and verify Duo Web two-factor handshake tokens",
    long_about = "Signs usernames into TX:APP requests for the Duo frame and verifies\n\
                  the AUTH:APP responses it returns.\n\n\
                  Keys are read from --config, then DUOWEB_APPLICATION_KEY,\n\
                  DUOWEB_INTEGRATION_KEY and DUOWEB_SECRET_KEY, then --ikey.\n\n\
                  Signing keys are never taken from the command line."
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Key file (TOML, YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub keys: KeyArgs,

    /// Evaluate at this Unix time instead of the system clock
    #[arg(long, global = true, value_name = "EPOCH", allow_negative_numbers = true)]
    pub now: Option<i64>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging (-v, -vv, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all logging except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Key overrides taking precedence over file and environment
///
/// Only the integration key is accepted here. The application and secret keys
/// would be visible to other local users through the process list.
#[derive(Args, Debug, Default, Clone)]
pub struct KeyArgs {
    /// Integration key (20 characters)
    #[arg(long, global = true, value_name = "KEY")]
    pub ikey: Option<String>,
}

impl KeyArgs {
    /// Overrides in the form accepted by `DuoWebConfig::load_with_overrides`
    #[must_use]
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        self.ikey
            .iter()
            .map(|ikey| ("integration_key", ikey.clone()))
            .collect()
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign a username into a TX:APP request
    Sign {
        /// Username to sign
        subject: String,
    },

    /// Verify an AUTH:APP response and print its username
    Verify {
        /// Response returned by the Duo frame
        response: String,
    },

    /// Key management
    #[command(subcommand)]
    Keys(KeysCommand),
}

/// Key management commands
#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Check that the configured keys have valid lengths
    Check,
}

impl Cli {
    /// Log level implied by `--quiet` and `-v`
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Initialize tracing subscriber based on verbosity level
    ///
    /// `RUST_LOG` takes precedence when set. Logs go to stderr so stdout
    /// carries only results.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}
