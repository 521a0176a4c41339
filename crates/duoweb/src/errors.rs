//! Error types for handshake signing and verification
//!
//! Every variant is a normal outcome of handling untrusted input. Messages are
//! safe to hand back to the token holder: they never carry keys, signatures,
//! subjects or the integration key found inside a cookie. Anything more
//! detailed is emitted through `tracing` on the server side only.

use std::fmt;

use thiserror::Error;

use crate::cookie::Role;

/// Identifies which of the three integration secrets failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Application key (`akey`), signs the `APP` token
    Application,
    /// Integration key (`ikey`), bound into every cookie
    Integration,
    /// Secret key (`skey`), signs the `TX` and `AUTH` tokens
    Secret,
}

impl KeyKind {
    /// Required length of this key in bytes
    #[must_use]
    pub const fn expected_len(self) -> usize {
        match self {
            Self::Application => crate::APPLICATION_KEY_LEN,
            Self::Integration => crate::INTEGRATION_KEY_LEN,
            Self::Secret => crate::SECRET_KEY_LEN,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Application => write!(f, "application key"),
            Self::Integration => write!(f, "integration key"),
            Self::Secret => write!(f, "secret key"),
        }
    }
}

/// Handshake errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuoWebError {
    /// One of the configured secrets has the wrong length
    #[error("Invalid {key}: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Which key failed
        key: KeyKind,
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Subject is empty or contains the field delimiter
    #[error("Invalid subject: {reason}")]
    InvalidSubject {
        /// Why the subject was rejected
        reason: &'static str,
    },

    /// Combined response did not split into exactly two tokens
    #[error("Malformed response: expected 2 tokens, found {parts}")]
    MalformedResponse {
        /// Number of `:`-separated parts found
        parts: usize,
    },

    /// Token did not split into exactly three fields
    #[error("Malformed token: expected 3 fields, found {fields}")]
    MalformedToken {
        /// Number of `|`-separated fields found
        fields: usize,
    },

    /// Token signature does not match its contents
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Token carries a different role tag than the one expected at its position
    #[error("Role mismatch: expected {expected}")]
    RoleMismatch {
        /// Role required at this position of the response
        expected: Role,
    },

    /// Payload was not valid base64, UTF-8, or carried a non-integer expiry
    #[error("Encoding error: {reason}")]
    EncodingError {
        /// Decoder failure description
        reason: String,
    },

    /// Decoded cookie did not split into exactly three fields
    #[error("Malformed payload: expected 3 fields, found {fields}")]
    MalformedPayload {
        /// Number of `|`-separated fields found
        fields: usize,
    },

    /// Cookie was issued for a different integration
    #[error("Integration key mismatch")]
    IntegrationKeyMismatch,

    /// Token lifetime has elapsed
    #[error("Token expired")]
    Expired,

    /// The two tokens name different subjects
    #[error("Subject mismatch between auth and app tokens")]
    SubjectMismatch,
}

impl DuoWebError {
    /// Stable short code for log fields
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidKeyLength { .. } => "invalid_key_length",
            Self::InvalidSubject { .. } => "invalid_subject",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::MalformedToken { .. } => "malformed_token",
            Self::SignatureMismatch => "signature_mismatch",
            Self::RoleMismatch { .. } => "role_mismatch",
            Self::EncodingError { .. } => "encoding_error",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::IntegrationKeyMismatch => "integration_key_mismatch",
            Self::Expired => "expired",
            Self::SubjectMismatch => "subject_mismatch",
        }
    }

    pub(crate) fn invalid_key_length(key: KeyKind, actual: usize) -> Self {
        Self::InvalidKeyLength {
            key,
            expected: key.expected_len(),
            actual,
        }
    }

    pub(crate) fn encoding(reason: impl fmt::Display) -> Self {
        Self::EncodingError {
            reason: reason.to_string(),
        }
    }
}
