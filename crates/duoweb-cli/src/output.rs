//! Output formatting for CLI results

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{CliError, CliResult};

/// Output format for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Bare values, one per line (default)
    #[default]
    Human,
    /// JSON object per result (for scripting)
    Json,
}

/// A single command result
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    /// Combined request produced by `sign`
    Signed {
        /// `TX:APP` request string
        request: String,
    },
    /// Subject accepted by `verify`
    Verified {
        /// Authenticated subject
        subject: String,
    },
    /// Key lengths accepted by `keys check`
    KeysValid {
        /// Integration key the keys belong to
        integration_key: String,
    },
}

impl Outcome {
    fn human(&self) -> String {
        match self {
            Self::Signed { request } => request.clone(),
            Self::Verified { subject } => subject.clone(),
            Self::KeysValid { integration_key } => format!("keys valid for {integration_key}"),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

/// Write a successful result
///
/// # Errors
///
/// Returns `CliError` if serialization or writing fails.
pub fn write_outcome(
    format: OutputFormat,
    outcome: &Outcome,
    writer: &mut dyn Write,
) -> CliResult<()> {
    match format {
        OutputFormat::Human => writeln!(writer, "{}", outcome.human())?,
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string(outcome)?)?,
    }
    Ok(())
}

/// Write a failure
///
/// # Errors
///
/// Returns `CliError` if serialization or writing fails.
pub fn write_error(format: OutputFormat, error: &CliError, writer: &mut dyn Write) -> CliResult<()> {
    match format {
        OutputFormat::Human => writeln!(writer, "Error: {error}")?,
        OutputFormat::Json => {
            let body = ErrorBody {
                error: error.code(),
                message: error.to_string(),
            };
            writeln!(writer, "{}", serde_json::to_string(&body)?)?;
        }
    }
    Ok(())
}
