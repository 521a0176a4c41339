//! # DuoWeb CLI
//!
//! Command-line access to Duo Web handshake signing and verification, for
//! reproducing handshakes and checking integration keys.
//!
//! ## Usage
//!
//! ```bash
//! # Sign a username with keys from a file
//! duoweb --config duo.toml sign alice
//!
//! # Verify a response at a fixed time, JSON output
//! duoweb --config duo.toml --now 1579051550 -f json verify 'AUTH|...|...:APP|...|...'
//!
//! # Check key lengths from the environment
//! DUOWEB_APPLICATION_KEY=... DUOWEB_INTEGRATION_KEY=... DUOWEB_SECRET_KEY=... duoweb keys check
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

use clap::Parser;

pub use cli::{Cli, Command, KeysCommand};
pub use error::{CliError, CliResult};
pub use output::{Outcome, OutputFormat};

/// Run the CLI application and return the process exit code
#[must_use]
pub fn run() -> i32 {
    let cli = Cli::parse();
    cli.init_tracing();

    let result = commands::execute(&cli)
        .and_then(|outcome| output::write_outcome(cli.format, &outcome, &mut std::io::stdout()));

    match result {
        Ok(()) => 0,
        Err(e) => {
            if output::write_error(cli.format, &e, &mut std::io::stderr()).is_err() {
                eprintln!("Error: {e}");
            }
            1
        }
    }
}
