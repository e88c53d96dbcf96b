//! `Upgate` Response Signing
//!
//! Binds an update decision to a shared secret so clients can detect
//! tampering or spoofing in transit.
//!
//! ## Scheme
//!
//! - **Encoding**: fixed-order compact JSON of `version`, `updateRequired`,
//!   `updateUrl`, `releaseNotes` (see [`canonical`])
//! - **MAC**: HMAC-SHA256 keyed with the shared API secret
//! - **Signature**: 64 lowercase hex characters, compared in constant time

pub mod canonical;
pub mod error;
pub mod key;
pub mod response;

pub use error::CryptoError;
pub use key::{SIGNATURE_HEX_LEN, SigningKey};
pub use response::SignedResponse;
