//! Wire-format behavior observable through the public API: strict length
//! checking, canonical bytes, and rejection of corrupted signatures.

use pq_picnic3::{Error, KeyPair, Picnic3L1, PicnicParameter, Signature, SALT_SIZE};
use rand::rngs::StdRng;
use rand::SeedableRng;
use signature::{Signer, Verifier};

type P = Picnic3L1;

fn signed_message() -> (KeyPair<P>, Vec<u8>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(7);
    let keypair = KeyPair::<P>::generate(&mut rng).expect("keygen failed");
    let msg = b"serialization test message".to_vec();
    let sig = keypair
        .signing_key()
        .try_sign(&msg)
        .expect("signing failed");
    (keypair, msg, sig.as_ref().to_vec())
}

#[test]
fn parsed_signature_keeps_canonical_bytes() {
    let (keypair, msg, bytes) = signed_message();
    let sig = Signature::<P>::try_from(bytes.as_slice()).expect("parse failed");
    assert_eq!(sig.as_ref(), bytes.as_slice());
    keypair
        .verifying_key()
        .verify(&msg, &sig)
        .expect("verification failed");
}

#[test]
fn truncated_signature_is_rejected_before_verification() {
    let (_, _, bytes) = signed_message();
    let err = Signature::<P>::try_from(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, Error::InvalidSignatureLength { .. }));
}

#[test]
fn padded_signature_is_rejected_before_verification() {
    let (_, _, bytes) = signed_message();
    let mut extended = bytes.clone();
    extended.push(0);
    let err = Signature::<P>::try_from(extended.as_slice()).unwrap_err();
    assert!(matches!(err, Error::InvalidSignatureLength { .. }));
}

#[test]
fn empty_signature_is_rejected() {
    let err = Signature::<P>::try_from([].as_slice()).unwrap_err();
    assert!(matches!(err, Error::InvalidSignatureLength { .. }));
}

/// A mutated signature must never verify: either parsing already rejects
/// it, or verification fails.
fn assert_mutation_rejected(keypair: &KeyPair<P>, msg: &[u8], mutated: &[u8]) {
    if let Ok(sig) = Signature::<P>::try_from(mutated) {
        assert!(keypair.verifying_key().verify(msg, &sig).is_err());
    }
}

#[test]
fn flipping_the_salt_fails_verification() {
    let (keypair, msg, bytes) = signed_message();
    for salt_byte in [0, SALT_SIZE / 2, SALT_SIZE - 1] {
        let mut mutated = bytes.clone();
        mutated[P::DIGEST_SIZE + salt_byte] ^= 1;
        assert_mutation_rejected(&keypair, &msg, &mutated);
    }
}

#[test]
fn flipping_the_challenge_fails_verification() {
    let (keypair, msg, bytes) = signed_message();
    for challenge_byte in [0, 15, 31] {
        let mut mutated = bytes.clone();
        mutated[challenge_byte] ^= 0x40;
        assert_mutation_rejected(&keypair, &msg, &mutated);
    }
}

#[test]
fn flipping_sampled_bytes_fails_verification() {
    let (keypair, msg, bytes) = signed_message();
    // Sweep the whole signature at a stride, hitting the seed reveal
    // data, the Merkle opening, and every proof field class.
    for offset in (0..bytes.len()).step_by(997) {
        let mut mutated = bytes.clone();
        mutated[offset] ^= 0x10;
        assert_mutation_rejected(&keypair, &msg, &mutated);
    }

    let mut mutated = bytes.clone();
    let last = mutated.len() - 1;
    mutated[last] ^= 0x80;
    assert_mutation_rejected(&keypair, &msg, &mutated);
}
