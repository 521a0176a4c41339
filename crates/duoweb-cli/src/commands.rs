//! Command implementations

use std::sync::Arc;

use duoweb::{DuoWeb, DuoWebConfig, FixedClock, Handshake, config::ENV_PREFIX};
use tracing::{debug, info};

use crate::cli::{Cli, Command, KeysCommand};
use crate::error::{CliError, CliResult};
use crate::output::Outcome;

/// Resolve keys, build the handshake and run the selected command
///
/// # Errors
///
/// Returns `CliError` if keys cannot be loaded or the handshake operation fails.
pub fn execute(cli: &Cli) -> CliResult<Outcome> {
    let config = DuoWebConfig::load_with_overrides(
        cli.config.as_deref(),
        ENV_PREFIX,
        cli.keys.overrides(),
    )?;
    let credentials = config.into_credentials()?;
    debug!(integration_key = credentials.integration_key(), "loaded keys");

    let mut duo = DuoWeb::from_credentials(&credentials);
    if let Some(now) = cli.now {
        let clock = FixedClock::from_unix(now)
            .ok_or_else(|| CliError::InvalidArguments(format!("--now {now} is out of range")))?;
        duo = duo.with_clock(Arc::new(clock));
    }

    match &cli.command {
        Command::Sign { subject } => {
            let request = duo.sign_request(subject)?;
            info!("signed request");
            Ok(Outcome::Signed { request })
        }
        Command::Verify { response } => {
            let subject = duo.verify_response(response)?;
            info!("verified response");
            Ok(Outcome::Verified { subject })
        }
        Command::Keys(KeysCommand::Check) => Ok(Outcome::KeysValid {
            integration_key: credentials.integration_key().to_string(),
        }),
    }
}
