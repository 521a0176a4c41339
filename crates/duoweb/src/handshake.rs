//! Combined signer and verifier for one integration

use std::sync::Arc;

use crate::Result;
use crate::clock::Clock;
use crate::credentials::Credentials;
use crate::signer::Signer;
use crate::verifier::Verifier;

/// Two-sided handshake: issue a request, later verify the response
///
/// Application code can depend on this trait and substitute a double in tests.
pub trait Handshake: Send + Sync {
    /// Sign `subject` into a `TX:APP` request
    ///
    /// # Errors
    ///
    /// Returns [`crate::DuoWebError::InvalidSubject`] for an empty subject or one containing `|`.
    fn sign_request(&self, subject: &str) -> Result<String>;

    /// Verify an `AUTH:APP` response and return its subject
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`crate::DuoWebError`].
    fn verify_response(&self, response: &str) -> Result<String>;
}

/// Signer and verifier sharing one set of credentials and one clock
#[derive(Debug, Clone)]
pub struct DuoWeb {
    signer: Signer,
    verifier: Verifier,
}

impl DuoWeb {
    /// Validate the keys and build both sides on the system clock
    ///
    /// # Errors
    ///
    /// Returns [`crate::DuoWebError::InvalidKeyLength`] naming the offending key.
    pub fn new(
        application_key: impl Into<String>,
        integration_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Credentials::new(application_key, integration_key, secret_key)?;
        Ok(Self::from_credentials(&credentials))
    }

    /// Build both sides from already validated credentials
    #[must_use]
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            signer: Signer::new(credentials),
            verifier: Verifier::new(credentials),
        }
    }

    /// Use `clock` for both signing and verification
    #[must_use]
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self {
            signer: self.signer.with_clock(Arc::clone(&clock)),
            verifier: self.verifier.with_clock(clock),
        }
    }

    /// Signing half
    #[must_use]
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Verifying half
    #[must_use]
    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }
}

impl Handshake for DuoWeb {
    fn sign_request(&self, subject: &str) -> Result<String> {
        self.signer.sign(subject)
    }

    fn verify_response(&self, response: &str) -> Result<String> {
        self.verifier.verify(response)
    }
}
