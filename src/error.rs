// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the Picnic3 signature scheme.

/// Errors that can occur during Picnic3 operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Signing failed.
    #[error("signing failed")]
    Signing,
    /// Signature verification failed.
    ///
    /// All verification failure modes collapse to this variant at the
    /// public API boundary.
    #[error("verification failed")]
    VerificationFailed,
    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// Signature byte count does not match the length implied by its challenge.
    #[error("invalid signature length: expected {expected}, got {got}")]
    InvalidSignatureLength {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// Trailing padding bits of a bit-packed signature field were non-zero.
    #[error("non-zero padding bits in signature field")]
    BadPadding,
    /// Seed tree reveal information was malformed.
    #[error("seed tree reconstruction failed")]
    SeedReconstruct,
    /// The online MPC simulation disagreed with the public output.
    #[error("MPC simulation inconsistent with public output")]
    MpcInconsistent,
    /// A Merkle inclusion proof did not reconstruct the expected root.
    #[error("Merkle tree verification failed")]
    MerkleVerify,
    /// The recomputed challenge differs from the one in the signature.
    #[error("challenge mismatch")]
    ChallengeMismatch,
}

impl From<Error> for signature::Error {
    fn from(e: Error) -> Self {
        signature::Error::from_source(e.to_string())
    }
}

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
