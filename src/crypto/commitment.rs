//! Commit-Reveal Codec
//!
//! Binds a choice to a published digest before the choice itself is
//! disclosed. The commitment is HMAC-SHA256 keyed with a fresh 64-byte
//! random secret; the message is the one-byte choice encoding. The
//! message space is tiny (three choices), so a plain hash would be
//! trivially brute-forceable -- the long random HMAC key is what makes
//! the digest non-invertible.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::game::choice::Choice;

/// Length of the per-round random secret in bytes.
pub const SECRET_LENGTH: usize = 64;

/// Length of the commitment digest in bytes (SHA-256).
pub const DIGEST_SIZE: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// Errors from the crypto layer.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The system entropy source could not supply the secret bytes.
    /// Never proceed with a partial or zeroed secret.
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] getrandom::Error),
}

/// A per-round random secret, used once as the HMAC key.
///
/// Owned exclusively by the party that generated it until it is
/// embedded in a [`Reveal`].
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; SECRET_LENGTH]);

impl Secret {
    /// Generate a fresh secret from the system entropy source.
    ///
    /// `getrandom` fills the whole buffer or fails; a short read can
    /// never be silently truncated into a weak secret.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; SECRET_LENGTH];
        getrandom::getrandom(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Reconstruct from raw bytes (wire decoding).
    pub fn from_bytes(bytes: [u8; SECRET_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; SECRET_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret material, even in logs.
        write!(f, "Secret(..)")
    }
}

/// A published digest binding a hidden choice.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Commitment([u8; DIGEST_SIZE]);

impl Commitment {
    /// Bind a choice to a secret: `hmac(secret, encode(choice))`.
    ///
    /// Deterministic, so the opponent can recompute it at reveal time.
    pub fn bind(choice: Choice, secret: &Secret) -> Self {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(&[choice.as_byte()]);
        let digest = mac.finalize().into_bytes();
        Self(digest.into())
    }

    /// Check a reveal against this commitment.
    ///
    /// Recomputes the digest from the revealed choice and secret and
    /// compares in constant time (via `Mac::verify_slice`), so a
    /// malicious peer learns nothing from response timing about where
    /// a forged digest first diverges.
    pub fn verify(&self, reveal: &Reveal) -> bool {
        let mut mac = HmacSha256::new_from_slice(reveal.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(&[reveal.choice.as_byte()]);
        mac.verify_slice(&self.0).is_ok()
    }

    /// Reconstruct from raw digest bytes (wire decoding).
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the underlying digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

/// The disclosure of a previously committed choice plus its secret.
///
/// Transmitted only after both sides have exchanged commitments.
#[derive(Clone, Debug)]
pub struct Reveal {
    /// The choice that was committed.
    pub choice: Choice,
    /// The secret that keyed the commitment.
    pub secret: Secret,
}

impl Reveal {
    /// Pair a choice with a freshly generated secret.
    pub fn new(choice: Choice) -> Result<Self, CryptoError> {
        Ok(Self {
            choice,
            secret: Secret::generate()?,
        })
    }

    /// The commitment this reveal should match.
    pub fn commitment(&self) -> Commitment {
        Commitment::bind(self.choice, &self.secret)
    }
}
