//! # DuoWeb - Two-Factor Handshake Tokens
//!
//! Issues and verifies the short-lived, HMAC-signed tokens that bridge a
//! primary login with a Duo second-factor prompt.
//!
//! ## Protocol
//!
//! Signing a username produces two tokens joined by `:`:
//!
//! ```text
//! TX|base64(user|ikey|now+300)|hex(hmac_sha1(skey, "TX|<b64>"))
//! APP|base64(user|ikey|now+3600)|hex(hmac_sha1(akey, "APP|<b64>"))
//! ```
//!
//! The Duo frame answers with the `TX` token re-tagged as `AUTH` alongside the
//! original `APP` token. Verification checks both signatures, role tags,
//! integration key binding and expiry, then requires both tokens to name the
//! same user.
//!
//! ## Architecture
//!
//! - `errors` - Error taxonomy
//! - `credentials` - Length-checked integration keys
//! - `clock` - Injectable time source
//! - `cookie` - Payload and token framing
//! - `signature` - HMAC-SHA1 signing and comparison
//! - `signer` - Request signing
//! - `verifier` - Response verification
//! - `handshake` - Signer and verifier behind one type
//! - `config` - Key loading from files and environment
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use duoweb::{DuoWeb, FixedClock, Handshake};
//!
//! let duo = DuoWeb::new(
//!     "0000000000000000000000000000000000000000",
//!     "00000000000000000000",
//!     "0000000000000000000000000000000000000000",
//! )?
//! .with_clock(Arc::new(FixedClock::from_unix(1_579_051_550).unwrap()));
//!
//! let request = duo.sign_request("a username")?;
//! assert!(request.starts_with("TX|"));
//! # Ok::<(), duoweb::DuoWebError>(())
//! ```

pub mod clock;
pub mod config;
pub mod cookie;
pub mod credentials;
pub mod errors;
pub mod handshake;
pub mod signature;
pub mod signer;
pub mod verifier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, DuoWebConfig};
pub use cookie::{Cookie, Role, SignedToken};
pub use credentials::Credentials;
pub use errors::{DuoWebError, KeyKind};
pub use handshake::{DuoWeb, Handshake};
pub use signer::Signer;
pub use verifier::Verifier;

/// DuoWeb result type
pub type Result<T> = std::result::Result<T, DuoWebError>;

/// Separates fields inside tokens and cookies
pub const FIELD_DELIMITER: char = '|';

/// Separates the two tokens of a request or response
pub const TOKEN_DELIMITER: char = ':';

/// Lifetime of the Duo-facing token (5 minutes)
pub const DUO_EXPIRE_SECS: i64 = 300;

/// Lifetime of the application token (1 hour)
pub const APP_EXPIRE_SECS: i64 = 3600;

/// Required application key length in bytes
pub const APPLICATION_KEY_LEN: usize = 40;

/// Required integration key length in bytes
pub const INTEGRATION_KEY_LEN: usize = 20;

/// Required secret key length in bytes
pub const SECRET_KEY_LEN: usize = 40;
