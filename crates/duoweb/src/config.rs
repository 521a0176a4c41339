//! Loading integration keys from files and the environment
//!
//! Keys are read from an optional TOML, YAML or JSON file; `DUOWEB_`-prefixed
//! environment variables override file values:
//!
//! ```toml
//! application_key = "..."   # DUOWEB_APPLICATION_KEY
//! integration_key = "..."   # DUOWEB_INTEGRATION_KEY
//! secret_key = "..."        # DUOWEB_SECRET_KEY
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::Deserialize;

use crate::Result;
use crate::credentials::Credentials;

/// Environment variable prefix for key overrides
pub const ENV_PREFIX: &str = "DUOWEB";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported file format
    #[error("Unsupported configuration file format. Use .toml, .yaml, .yml, or .json")]
    UnsupportedFormat,

    /// Configuration parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] config::ConfigError),
}

/// Unvalidated integration keys as loaded from configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DuoWebConfig {
    /// Application key (40 bytes)
    pub application_key: SecretString,
    /// Integration key (20 bytes)
    pub integration_key: String,
    /// Secret key (40 bytes)
    pub secret_key: SecretString,
}

impl DuoWebConfig {
    /// Load keys from `DUOWEB_*` environment variables only
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if a key is missing.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::load(None, ENV_PREFIX)
    }

    /// Load keys from a file, with `DUOWEB_*` environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file doesn't exist
    /// - The file format is unsupported
    /// - A key is missing after merging file and environment
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        Self::load(Some(path.as_ref()), ENV_PREFIX)
    }

    /// Load keys from an optional file with a custom environment prefix
    ///
    /// # Errors
    ///
    /// Same as [`DuoWebConfig::from_file`].
    pub fn load(path: Option<&Path>, env_prefix: &str) -> std::result::Result<Self, ConfigError> {
        Self::load_with_overrides(path, env_prefix, std::iter::empty())
    }

    /// Load keys as [`DuoWebConfig::load`] does, then apply explicit overrides
    ///
    /// Overrides take precedence over both the file and the environment. Keys
    /// are the field names (`application_key`, `integration_key`, `secret_key`).
    ///
    /// # Errors
    ///
    /// Same as [`DuoWebConfig::from_file`].
    pub fn load_with_overrides<I>(
        path: Option<&Path>,
        env_prefix: &str,
        overrides: I,
    ) -> std::result::Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            let format = match path.extension().and_then(|s| s.to_str()) {
                Some("toml") => FileFormat::Toml,
                Some("yaml") | Some("yml") => FileFormat::Yaml,
                Some("json") => FileFormat::Json,
                _ => return Err(ConfigError::UnsupportedFormat),
            };
            let name = path.to_str().ok_or(ConfigError::UnsupportedFormat)?;
            builder = builder.add_source(File::new(name, format));
        }

        builder = builder.add_source(Environment::with_prefix(env_prefix));
        for (key, value) in overrides {
            builder = builder.set_override(key, value)?;
        }

        let config = builder.build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate key lengths
    ///
    /// # Errors
    ///
    /// Returns [`crate::DuoWebError::InvalidKeyLength`] naming the offending key.
    pub fn into_credentials(self) -> Result<Credentials> {
        Credentials::from_secrets(self.application_key, self.integration_key, self.secret_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    const AKEY: &str = "AKEY_AKEY_AKEY_AKEY_AKEY_AKEY_AKEY_AKEY_";
    const IKEY: &str = "IKEY_IKEY_IKEY_IKEY_";
    const SKEY: &str = "SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_";

    fn write_config(ext: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml() {
        let file = write_config(
            "toml",
            &format!(
                "application_key = \"{AKEY}\"\nintegration_key = \"{IKEY}\"\nsecret_key = \"{SKEY}\"\n"
            ),
        );
        let config = DuoWebConfig::load(Some(file.path()), "DUOWEB_TEST_TOML").unwrap();
        assert_eq!(config.integration_key, IKEY);
        assert_eq!(config.secret_key.expose_secret(), SKEY);

        let creds = config.into_credentials().unwrap();
        assert_eq!(creds.integration_key(), IKEY);
    }

    #[test]
    fn test_load_json() {
        let file = write_config(
            "json",
            &format!(
                r#"{{"application_key":"{AKEY}","integration_key":"{IKEY}","secret_key":"{SKEY}"}}"#
            ),
        );
        let config = DuoWebConfig::load(Some(file.path()), "DUOWEB_TEST_JSON").unwrap();
        assert_eq!(config.application_key.expose_secret(), AKEY);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let file = write_config(
            "toml",
            &format!("application_key = \"{AKEY}\"\nintegration_key = \"short\"\n"),
        );
        let config = DuoWebConfig::load_with_overrides(
            Some(file.path()),
            "DUOWEB_TEST_OVERRIDE",
            [
                ("integration_key", IKEY.to_string()),
                ("secret_key", SKEY.to_string()),
            ],
        )
        .unwrap();
        assert_eq!(config.integration_key, IKEY);
        assert!(config.into_credentials().is_ok());
    }

    #[test]
    fn test_overrides_without_file() {
        let config = DuoWebConfig::load_with_overrides(
            None,
            "DUOWEB_TEST_NOFILE",
            [
                ("application_key", AKEY.to_string()),
                ("integration_key", IKEY.to_string()),
                ("secret_key", SKEY.to_string()),
            ],
        )
        .unwrap();
        assert_eq!(config.secret_key.expose_secret(), SKEY);
    }

    #[test]
    fn test_missing_file() {
        let err = DuoWebConfig::from_file("/nonexistent/duoweb.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_unsupported_format() {
        let file = write_config("ini", "application_key=x");
        let err = DuoWebConfig::load(Some(file.path()), "DUOWEB_TEST_INI").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat));
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let file = write_config("toml", &format!("application_key = \"{AKEY}\"\n"));
        let err = DuoWebConfig::load(Some(file.path()), "DUOWEB_TEST_MISSING").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_short_key_fails_validation() {
        let file = write_config(
            "toml",
            &format!(
                "application_key = \"{AKEY}\"\nintegration_key = \"short\"\nsecret_key = \"{SKEY}\"\n"
            ),
        );
        let config = DuoWebConfig::load(Some(file.path()), "DUOWEB_TEST_SHORT").unwrap();
        assert_eq!(
            config.into_credentials().unwrap_err().kind(),
            "invalid_key_length"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = DuoWebConfig {
            application_key: SecretString::new(AKEY.to_string()),
            integration_key: IKEY.to_string(),
            secret_key: SecretString::new(SKEY.to_string()),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains(AKEY));
        assert!(!debug.contains(SKEY));
    }
}
