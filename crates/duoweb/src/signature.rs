//! HMAC-SHA1 token signatures
//!
//! Signatures are lowercase hex HMAC-SHA1 digests. Verification does not
//! compare the hex strings directly: both the recomputed and the supplied
//! signature are run through HMAC once more with the same key and the two
//! outer digests are compared. Interoperating implementations do the same,
//! so the scheme is kept as is; the outer comparison itself is constant-time.

use ring::hmac;
use subtle::ConstantTimeEq;

/// Build an HMAC-SHA1 key from raw secret bytes
#[must_use]
pub fn signing_key(secret: &[u8]) -> hmac::Key {
    hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, secret)
}

/// Lowercase hex HMAC-SHA1 of `message`
#[must_use]
pub fn sign_hex(key: &hmac::Key, message: &str) -> String {
    hex::encode(hmac::sign(key, message.as_bytes()))
}

/// Double-HMAC comparison of a recomputed signature against a supplied one
#[must_use]
pub fn signatures_match(key: &hmac::Key, expected_hex: &str, supplied_hex: &str) -> bool {
    let expected = hmac::sign(key, expected_hex.as_bytes());
    let supplied = hmac::sign(key, supplied_hex.as_bytes());
    expected.as_ref().ct_eq(supplied.as_ref()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_hex_known_vector() {
        // RFC 2202 test case 2
        let key = signing_key(b"Jefe");
        assert_eq!(
            sign_hex(&key, "what do ya want for nothing?"),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_sign_hex_is_lowercase_sha1_length() {
        let key = signing_key(&[b'0'; 40]);
        let sig = sign_hex(&key, "TX|payload");
        assert_eq!(sig.len(), 40);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signatures_match_same_value() {
        let key = signing_key(b"SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_");
        let sig = sign_hex(&key, "AUTH|cGF5bG9hZA==");
        assert!(signatures_match(&key, &sig, &sig));
    }

    #[test]
    fn test_signatures_match_rejects_other_value() {
        let key = signing_key(b"SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_");
        let sig = sign_hex(&key, "AUTH|cGF5bG9hZA==");
        let mut tampered = sig.clone();
        tampered.replace_range(39..40, if sig.ends_with('0') { "1" } else { "0" });
        assert!(!signatures_match(&key, &sig, &tampered));
        assert!(!signatures_match(&key, &sig, ""));
    }

    #[test]
    fn test_signatures_match_is_case_sensitive() {
        let key = signing_key(b"key");
        let sig = sign_hex(&key, "APP|x");
        assert!(!signatures_match(&key, &sig, &sig.to_uppercase()));
    }
}
