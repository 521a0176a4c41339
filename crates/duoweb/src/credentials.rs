//! Integration secrets
//!
//! The application and secret keys sign tokens and are kept in
//! [`SecretString`] so they never show up in `Debug` output. The integration
//! key identifies the integration and is embedded in every cookie.

use ring::hmac;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::cookie::Role;
use crate::errors::{DuoWebError, KeyKind};
use crate::signature::signing_key;
use crate::Result;

/// Validated application, integration and secret keys
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawCredentials")]
pub struct Credentials {
    application_key: SecretString,
    integration_key: String,
    secret_key: SecretString,
}

#[derive(Deserialize)]
struct RawCredentials {
    application_key: SecretString,
    integration_key: String,
    secret_key: SecretString,
}

impl TryFrom<RawCredentials> for Credentials {
    type Error = DuoWebError;

    fn try_from(raw: RawCredentials) -> Result<Self> {
        Self::from_secrets(raw.application_key, raw.integration_key, raw.secret_key)
    }
}

impl Credentials {
    /// Validate and store the three keys
    ///
    /// # Errors
    ///
    /// Returns [`DuoWebError::InvalidKeyLength`] naming the first key (checked in
    /// application, integration, secret order) whose byte length is wrong.
    pub fn new(
        application_key: impl Into<String>,
        integration_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        Self::from_secrets(
            SecretString::new(application_key.into()),
            integration_key.into(),
            SecretString::new(secret_key.into()),
        )
    }

    pub(crate) fn from_secrets(
        application_key: SecretString,
        integration_key: String,
        secret_key: SecretString,
    ) -> Result<Self> {
        check_len(KeyKind::Application, application_key.expose_secret())?;
        check_len(KeyKind::Integration, &integration_key)?;
        check_len(KeyKind::Secret, secret_key.expose_secret())?;

        Ok(Self {
            application_key,
            integration_key,
            secret_key,
        })
    }

    /// Integration key bound into every cookie
    #[must_use]
    pub fn integration_key(&self) -> &str {
        &self.integration_key
    }

    pub(crate) fn key_ring(&self) -> KeyRing {
        KeyRing {
            application: signing_key(self.application_key.expose_secret().as_bytes()),
            secret: signing_key(self.secret_key.expose_secret().as_bytes()),
            integration_key: self.integration_key.clone(),
        }
    }
}

fn check_len(key: KeyKind, value: &str) -> Result<()> {
    if value.len() == key.expected_len() {
        Ok(())
    } else {
        Err(DuoWebError::invalid_key_length(key, value.len()))
    }
}

/// Prepared HMAC keys shared by signing and verification
#[derive(Debug, Clone)]
pub(crate) struct KeyRing {
    application: hmac::Key,
    secret: hmac::Key,
    integration_key: String,
}

impl KeyRing {
    pub(crate) fn for_role(&self, role: Role) -> &hmac::Key {
        if role.uses_secret_key() {
            &self.secret
        } else {
            &self.application
        }
    }

    pub(crate) fn integration_key(&self) -> &str {
        &self.integration_key
    }
}
