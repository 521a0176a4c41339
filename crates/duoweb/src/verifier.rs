//! Response verification
//!
//! Checks an `AUTH:APP` response returned through the Duo frame. Each step is
//! a hard gate and the first failure is reported:
//!
//! 1. split into exactly two tokens
//! 2. validate the `AUTH` token with the secret key
//! 3. validate the `APP` token with the application key
//! 4. require both tokens to name the same subject
//!
//! Validating a single token checks, in order: field count, signature, role
//! tag, payload encoding, payload field count and expiry format, integration
//! key, then expiry.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::cookie::{Cookie, Role, SignedToken};
use crate::credentials::{Credentials, KeyRing};
use crate::errors::DuoWebError;
use crate::signature::{sign_hex, signatures_match};
use crate::{Result, TOKEN_DELIMITER};

/// Verifies combined `AUTH:APP` responses
#[derive(Clone)]
pub struct Verifier {
    keys: KeyRing,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("integration_key", &self.keys.integration_key())
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// Create a verifier reading the system clock
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            keys: credentials.key_ring(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify a combined response and return the authenticated subject
    ///
    /// # Errors
    ///
    /// Any of [`DuoWebError::MalformedResponse`], [`DuoWebError::MalformedToken`],
    /// [`DuoWebError::SignatureMismatch`], [`DuoWebError::RoleMismatch`],
    /// [`DuoWebError::EncodingError`], [`DuoWebError::MalformedPayload`],
    /// [`DuoWebError::IntegrationKeyMismatch`], [`DuoWebError::Expired`] or
    /// [`DuoWebError::SubjectMismatch`], whichever check fails first.
    pub fn verify(&self, response: &str) -> Result<String> {
        let now = self.clock.unix_now();
        let result = self.verify_at(response, now);
        if let Err(e) = &result {
            warn!(reason = e.kind(), now, "rejected handshake response");
        }
        result
    }

    fn verify_at(&self, response: &str, now: i64) -> Result<String> {
        let parts: Vec<&str> = response.split(TOKEN_DELIMITER).collect();
        let [auth, app] = parts[..] else {
            return Err(DuoWebError::MalformedResponse { parts: parts.len() });
        };

        let auth_subject = self.parse_token(auth, Role::Auth, now)?;
        let app_subject = self.parse_token(app, Role::App, now)?;

        if auth_subject != app_subject {
            debug!(
                auth_subject = %auth_subject,
                app_subject = %app_subject,
                "auth and app subjects differ"
            );
            return Err(DuoWebError::SubjectMismatch);
        }

        debug!(subject = %auth_subject, "verified handshake response");
        Ok(auth_subject)
    }

    /// Validate one token against `role` and return its subject
    ///
    /// `now` is the Unix time the token must not yet have reached.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing check; see the module docs for the order.
    pub fn parse_token(&self, raw: &str, role: Role, now: i64) -> Result<String> {
        let token = SignedToken::parse(raw)?;
        let key = self.keys.for_role(role);

        let expected = sign_hex(key, &token.signed_portion());
        if !signatures_match(key, &expected, token.signature) {
            return Err(DuoWebError::SignatureMismatch);
        }

        if token.role != role.as_str() {
            trace!(expected = %role, found = token.role, "role tag mismatch");
            return Err(DuoWebError::RoleMismatch { expected: role });
        }

        let cookie = Cookie::decode(token.payload)?;

        if cookie.integration_key != self.keys.integration_key() {
            return Err(DuoWebError::IntegrationKeyMismatch);
        }

        if now >= cookie.expires {
            trace!(role = %role, expires = cookie.expires, now, "token expired");
            return Err(DuoWebError::Expired);
        }

        trace!(role = %role, expires = cookie.expires, "token accepted");
        Ok(cookie.subject)
    }
}
