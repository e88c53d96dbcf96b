//! Shared-secret signing key.
//!
//! The server and its clients hold the same secret. A signature is the
//! lowercase hex HMAC-SHA256 of the canonical payload bytes.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use upgate_core::UpdateDecision;
use zeroize::Zeroize;

use crate::canonical;
use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 signature.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// An HMAC-SHA256 key derived from the shared API secret.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl SigningKey {
    /// Key a signer with `secret`. Empty secrets are rejected.
    ///
    /// The caller's buffer is wiped once the HMAC state is keyed.
    pub fn new(mut secret: Vec<u8>) -> Result<Self, CryptoError> {
        if secret.is_empty() {
            return Err(CryptoError::InvalidKey("secret must not be empty".into()));
        }
        let mac = HmacSha256::new_from_slice(&secret)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()));
        secret.zeroize();
        Ok(Self { mac: mac? })
    }

    /// Key a signer with the UTF-8 bytes of `secret`.
    pub fn from_secret_str(secret: &str) -> Result<Self, CryptoError> {
        Self::new(secret.as_bytes().to_vec())
    }

    /// Hex HMAC-SHA256 of `message`.
    pub fn sign(&self, message: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(message);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Sign the canonical encoding of `decision`.
    pub fn sign_decision(&self, decision: &UpdateDecision) -> String {
        self.sign(canonical::encode(decision).as_bytes())
    }

    /// Check `signature` against `message` in constant time.
    ///
    /// Only the exact lowercase hex form is accepted.
    pub fn verify(&self, message: &[u8], signature: &str) -> Result<(), CryptoError> {
        let expected = self.sign(message);
        if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            Ok(())
        } else {
            Err(CryptoError::SignatureMismatch)
        }
    }

    /// Verify a signature received alongside `decision`.
    pub fn verify_decision(
        &self,
        decision: &UpdateDecision,
        signature: &str,
    ) -> Result<(), CryptoError> {
        self.verify(canonical::encode(decision).as_bytes(), signature)
    }
}
