//! Request signing
//!
//! Produces the `TX:APP` pair handed to the Duo frame. Both tokens carry the
//! same subject and integration key; they differ in role tag, lifetime and
//! signing key.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::cookie::{Cookie, Role, signed_portion};
use crate::credentials::{Credentials, KeyRing};
use crate::errors::DuoWebError;
use crate::signature::sign_hex;
use crate::{FIELD_DELIMITER, Result, TOKEN_DELIMITER};

/// Signs subjects into combined `TX:APP` requests
#[derive(Clone)]
pub struct Signer {
    keys: KeyRing,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("integration_key", &self.keys.integration_key())
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Create a signer reading the system clock
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

    /// Sign `subject` into `TX-token:APP-token`
    ///
    /// The clock is read once; both expirations derive from that reading.
    ///
    /// # Errors
    ///
    /// Returns [`DuoWebError::InvalidSubject`] if `subject` is empty or contains `|`.
    pub fn sign(&self, subject: &str) -> Result<String> {
        validate_subject(subject)?;

        let now = self.clock.unix_now();
        let duo = self.sign_token(Role::Tx, subject, now);
        let app = self.sign_token(Role::App, subject, now);

        debug!(issued_at = now, "signed handshake request");
        Ok(format!("{duo}{TOKEN_DELIMITER}{app}"))
    }

    /// Sign a single token of `role` for `subject`, expiring `role.lifetime_secs()` after `now`
    ///
    /// The subject is not validated here; [`Signer::sign`] does that.
    #[must_use]
    pub fn sign_token(&self, role: Role, subject: &str, now: i64) -> String {
        let cookie = Cookie {
            subject: subject.to_string(),
            integration_key: self.keys.integration_key().to_string(),
            expires: now.saturating_add(role.lifetime_secs()),
        };
        let payload = cookie.encode();
        let portion = signed_portion(role.as_str(), &payload);
        let sig = sign_hex(self.keys.for_role(role), &portion);
        format!("{portion}{FIELD_DELIMITER}{sig}")
    }
}

fn validate_subject(subject: &str) -> Result<()> {
    if subject.is_empty() {
        return Err(DuoWebError::InvalidSubject {
            reason: "subject is empty",
        });
    }
    if subject.contains(FIELD_DELIMITER) {
        return Err(DuoWebError::InvalidSubject {
            reason: "subject contains invalid character '|'",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    const ZERO_40: &str = "0000000000000000000000000000000000000000";
    const ZERO_20: &str = "00000000000000000000";

    fn signer() -> Signer {
        let creds = Credentials::new(ZERO_40, ZERO_20, ZERO_40).unwrap();
        Signer::new(&creds).with_clock(Arc::new(FixedClock::from_unix(1_579_051_550).unwrap()))
    }

    #[test]
    fn test_sign_known_vector() {
        let signed = signer().sign("a username").unwrap();
        assert_eq!(
            signed,
            "TX|YSB1c2VybmFtZXwwMDAwMDAwMDAwMDAwMDAwMDAwMHwxNTc5MDUxODUw|4cb154be41f943a7be697d5a0f935f3115485fe0:\
             APP|YSB1c2VybmFtZXwwMDAwMDAwMDAwMDAwMDAwMDAwMHwxNTc5MDU1MTUw|41d5bf2eeceade27c6a2726d1180fcd9cea2f1f6"
        );
    }

    #[test]
    fn test_sign_rejects_empty_subject() {
        assert_eq!(
            signer().sign("").unwrap_err().kind(),
            "invalid_subject"
        );
    }

    #[test]
    fn test_sign_rejects_delimiter() {
        assert_eq!(
            signer().sign("|").unwrap_err(),
            DuoWebError::InvalidSubject {
                reason: "subject contains invalid character '|'",
            }
        );
        assert!(signer().sign("alice|admin").is_err());
    }

    #[test]
    fn test_sign_allows_token_delimiter_in_subject() {
        // The subject travels base64-encoded, so ':' cannot split the response
        let signed = signer().sign("domain:alice").unwrap();
        assert_eq!(signed.split(':').count(), 2);
    }

    #[test]
    fn test_sign_token_lifetimes() {
        let s = signer();
        let tx = s.sign_token(Role::Tx, "bob", 100);
        let app = s.sign_token(Role::App, "bob", 100);

        let tx_payload = tx.split('|').nth(1).unwrap();
        let app_payload = app.split('|').nth(1).unwrap();
        assert_eq!(Cookie::decode(tx_payload).unwrap().expires, 400);
        assert_eq!(Cookie::decode(app_payload).unwrap().expires, 3700);
    }

    #[test]
    fn test_debug_omits_keys() {
        let debug = format!("{:?}", signer());
        assert!(debug.contains("Signer"));
        assert!(!debug.contains(ZERO_40));
    }
}
