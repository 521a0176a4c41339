//! Property-based tests for signing and verification
//!
//! - Any valid subject survives a sign/verify round trip inside the TX window
//! - Any subject containing `|` is rejected
//! - Changing any single character of a response is never silently accepted

use std::sync::Arc;

use proptest::prelude::*;

use duoweb::{DuoWeb, FixedClock, Handshake, Role};

const AKEY: &str = "AKEY_AKEY_AKEY_AKEY_AKEY_AKEY_AKEY_AKEY_";
const IKEY: &str = "IKEY_IKEY_IKEY_IKEY_";
const SKEY: &str = "SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_SKEY_";
const NOW: i64 = 1_700_000_000;

fn duo_at(now: i64) -> DuoWeb {
    DuoWeb::new(AKEY, IKEY, SKEY)
        .unwrap()
        .with_clock(Arc::new(FixedClock::from_unix(now).unwrap()))
}

/// Sign `subject` and turn the request into the response the Duo side returns
fn response_for(subject: &str) -> String {
    let duo = duo_at(NOW);
    let request = duo.sign_request(subject).unwrap();
    let (_, app) = request.split_once(':').unwrap();
    let auth = duo.signer().sign_token(Role::Auth, subject, NOW);
    format!("{auth}:{app}")
}

proptest! {
    #[test]
    fn test_round_trip_any_subject(subject in "[^|]{1,64}", elapsed in 0i64..300) {
        let response = response_for(&subject);
        let verified = duo_at(NOW + elapsed).verify_response(&response).unwrap();
        prop_assert_eq!(verified, subject);
    }

    #[test]
    fn test_expired_after_window(subject in "[a-z0-9_.@]{1,32}", elapsed in 300i64..100_000) {
        let response = response_for(&subject);
        let err = duo_at(NOW + elapsed).verify_response(&response).unwrap_err();
        prop_assert_eq!(err.kind(), "expired");
    }

    #[test]
    fn test_delimiter_always_rejected(prefix in "[^|]{0,16}", suffix in "[^|]{0,16}") {
        let subject = format!("{prefix}|{suffix}");
        let err = duo_at(NOW).sign_request(&subject).unwrap_err();
        prop_assert_eq!(err.kind(), "invalid_subject");
    }

    #[test]
    fn test_single_character_tamper_rejected(
        subject in "[a-z]{1,16}",
        index in any::<prop::sample::Index>(),
        replacement in "[A-Za-z0-9+/=|:]",
    ) {
        let response = response_for(&subject);
        let pos = index.index(response.len());
        let original = &response[pos..=pos];
        prop_assume!(original != replacement);

        let mut tampered = response.clone();
        tampered.replace_range(pos..=pos, &replacement);

        prop_assert!(duo_at(NOW).verify_response(&tampered).is_err());
    }
}
