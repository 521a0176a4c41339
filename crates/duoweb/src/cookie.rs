//! Cookie and token framing
//!
//! A cookie is the pipe-joined payload `subject|ikey|expires`, carried
//! base64-encoded inside a signed token `ROLE|base64(cookie)|hexsig`.
//!
//! Payloads use the standard alphabet with required padding. Non-zero
//! trailing bits in the last symbol are tolerated on decode, as other Duo Web
//! implementations accept them.

use std::fmt;

use base64::{
    Engine as _, alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};

use crate::errors::DuoWebError;
use crate::{FIELD_DELIMITER, Result};

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Purpose of a signed token, which also selects its signing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Short-lived token sent to Duo, signed with the secret key
    Tx,
    /// Duo's re-tagged echo of the `TX` token, signed with the secret key
    Auth,
    /// Long-lived token kept by the application, signed with the application key
    App,
}

impl Role {
    /// Wire tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tx => "TX",
            Self::Auth => "AUTH",
            Self::App => "APP",
        }
    }

    /// Lifetime in seconds applied when a token of this role is signed
    #[must_use]
    pub const fn lifetime_secs(self) -> i64 {
        match self {
            Self::Tx | Self::Auth => crate::DUO_EXPIRE_SECS,
            Self::App => crate::APP_EXPIRE_SECS,
        }
    }

    /// Whether the token is signed with the secret key (otherwise the application key)
    #[must_use]
    pub const fn uses_secret_key(self) -> bool {
        matches!(self, Self::Tx | Self::Auth)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Username the token was issued for
    pub subject: String,
    /// Integration key of the issuing integration
    pub integration_key: String,
    /// Expiry as Unix epoch seconds
    pub expires: i64,
}

impl Cookie {
    /// Join the fields with `|` and base64-encode them (standard alphabet, padded)
    #[must_use]
    pub fn encode(&self) -> String {
        let joined = format!(
            "{}{d}{}{d}{}",
            self.subject,
            self.integration_key,
            self.expires,
            d = FIELD_DELIMITER
        );
        PAYLOAD_ENGINE.encode(joined)
    }

    /// Decode a base64 payload back into its three fields
    ///
    /// # Errors
    ///
    /// - [`DuoWebError::EncodingError`] if the payload is not base64 or UTF-8,
    ///   or if the expiry is not an integer
    /// - [`DuoWebError::MalformedPayload`] if there are not exactly three fields
    pub fn decode(payload: &str) -> Result<Self> {
        let bytes = PAYLOAD_ENGINE.decode(payload).map_err(DuoWebError::encoding)?;
        let text = String::from_utf8(bytes).map_err(DuoWebError::encoding)?;

        let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();
        let [subject, integration_key, expires] = fields[..] else {
            return Err(DuoWebError::MalformedPayload {
                fields: fields.len(),
            });
        };

        let expires = expires.parse::<i64>().map_err(DuoWebError::encoding)?;

        Ok(Self {
            subject: subject.to_string(),
            integration_key: integration_key.to_string(),
            expires,
        })
    }
}

/// Borrowed view of a `ROLE|payload|signature` token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedToken<'a> {
    /// Role tag as found on the wire (not yet trusted)
    pub role: &'a str,
    /// Base64 cookie
    pub payload: &'a str,
    /// Lowercase hex HMAC-SHA1 over `role|payload`
    pub signature: &'a str,
}

impl<'a> SignedToken<'a> {
    /// Split a raw token into its three fields
    ///
    /// # Errors
    ///
    /// Returns [`DuoWebError::MalformedToken`] unless there are exactly three fields.
    pub fn parse(raw: &'a str) -> Result<Self> {
        let fields: Vec<&str> = raw.split(FIELD_DELIMITER).collect();
        match fields[..] {
            [role, payload, signature] => Ok(Self {
                role,
                payload,
                signature,
            }),
            _ => Err(DuoWebError::MalformedToken {
                fields: fields.len(),
            }),
        }
    }

    /// The portion covered by the signature: `role|payload`
    #[must_use]
    pub fn signed_portion(&self) -> String {
        signed_portion(self.role, self.payload)
    }
}

pub(crate) fn signed_portion(role: &str, payload: &str) -> String {
    format!("{role}{FIELD_DELIMITER}{payload}")
}
