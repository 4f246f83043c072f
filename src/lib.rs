// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picnic3 post-quantum signature scheme.
//!
//! This crate implements the Picnic3 signature scheme: a zero-knowledge
//! proof of knowledge of a LowMC key, built from an MPC-in-the-Head
//! protocol with pre-processing, seed trees, a cut-and-choose challenge,
//! and a Merkle commitment over the per-round view hashes.
//!
//! # Supported Parameter Sets
//!
//! - [`Picnic3L1`] - NIST security level 1
//! - [`Picnic3L3`] - NIST security level 3
//! - [`Picnic3L5`] - NIST security level 5
//!
//! # Example
//!
//! ```
//! use pq_picnic3::{KeyPair, Picnic3L1};
//! use signature::{Signer, Verifier};
//!
//! let mut rng = rand::rng();
//! let keypair = KeyPair::<Picnic3L1>::generate(&mut rng).expect("keygen");
//! let msg = b"hello world";
//!
//! let sig = keypair.signing_key().try_sign(msg).expect("sign");
//! keypair.verifying_key().verify(msg, &sig).expect("verify");
//! ```

pub mod error;
pub mod keypair;
pub mod params;
pub mod picnic_signature;
pub mod signing_key;
pub mod verifying_key;

mod bits;
mod challenge;
mod commit;
mod hashing;
mod lowmc;
mod proof;
mod sign;
mod tapes;
mod tree;
mod verify;

pub use error::Error;
pub use keypair::KeyPair;
pub use params::{Picnic3L1, Picnic3L3, Picnic3L5, PicnicParameter, SALT_SIZE};
pub use picnic_signature::Signature;
pub use signing_key::SigningKey;
pub use verifying_key::VerifyingKey;

#[cfg(feature = "serde")]
#[cfg(test)]
mod tests {
    use super::*;
    use signature::Signer;

    fn keypair_serde<P: PicnicParameter>() {
        let mut rng = rand::rng();
        let keypair = KeyPair::<P>::generate(&mut rng).expect("keygen");
        let serialized = serde_json::to_string(&keypair).expect("serialize");
        let deserialized: KeyPair<P> = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(keypair, deserialized);

        let serialized = postcard::to_stdvec(&keypair).expect("serialize");
        let deserialized: KeyPair<P> = postcard::from_bytes(&serialized).expect("deserialize");
        assert_eq!(keypair, deserialized);
    }

    fn signature_serde<P: PicnicParameter>() {
        let mut rng = rand::rng();
        let keypair = KeyPair::<P>::generate(&mut rng).expect("keygen");
        let sig = keypair.signing_key().try_sign(b"hello world").expect("sign");
        let serialized = serde_json::to_string(&sig).expect("serialize");
        let deserialized: Signature<P> = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(sig, deserialized);

        let serialized = postcard::to_stdvec(&sig).expect("serialize");
        let deserialized: Signature<P> = postcard::from_bytes(&serialized).expect("deserialize");
        assert_eq!(sig, deserialized);
    }

    #[test]
    fn keypair_serde_l1() {
        keypair_serde::<Picnic3L1>();
    }

    #[test]
    fn keypair_serde_l3() {
        keypair_serde::<Picnic3L3>();
    }

    #[test]
    fn keypair_serde_l5() {
        keypair_serde::<Picnic3L5>();
    }

    #[test]
    fn signature_serde_l1() {
        signature_serde::<Picnic3L1>();
    }
}
