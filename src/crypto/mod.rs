//! Cryptographic primitives for the commit-reveal protocol.
//!
//! - `commitment` - secrets, commitment digests, and reveal verification

pub mod commitment;

pub use commitment::{Commitment, CryptoError, Reveal, Secret, DIGEST_SIZE, SECRET_LENGTH};
