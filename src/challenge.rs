// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fiat-Shamir transcript hashing and challenge expansion.
//!
//! The challenge digest binds every round commitment, the Merkle root
//! over the view commitments, the salt, the key material, and the
//! message. It is then expanded into tau distinct round indices and tau
//! party indices by slicing successive digest states into fixed-width
//! chunks, rehashing with a domain-separation prefix whenever a pass
//! runs out of bits. The party pass continues from the digest state the
//! round pass ended with.

use crate::bits::{ceil_log2, get_bit};
use crate::hashing::HashCtx;
use crate::params::{PicnicParameter, HASH_PREFIX_1, SALT_SIZE};

/// Split `input` into consecutive `chunk_bits`-wide little-endian values.
fn bits_to_chunks(chunk_bits: u32, input: &[u8]) -> Vec<u16> {
    let chunk_count = input.len() * 8 / chunk_bits as usize;
    (0..chunk_count)
        .map(|i| {
            let mut chunk = 0u16;
            for j in 0..chunk_bits as usize {
                chunk += u16::from(get_bit(input, i * chunk_bits as usize + j)) << j;
            }
            chunk
        })
        .collect()
}

fn append_unique(list: &mut Vec<u16>, value: u16) {
    if !list.contains(&value) {
        list.push(value);
    }
}

fn rehash<P: PicnicParameter>(h: &mut [u8]) {
    let mut ctx = HashCtx::new_prefixed(P::DIGEST_SIZE, HASH_PREFIX_1);
    ctx.update(h);
    ctx.finalize().squeeze(h);
}

/// Expand a challenge digest into the opened-round list and the
/// per-opened-round unopened-party list.
pub(crate) fn expand_challenge<P: PicnicParameter>(digest: &[u8]) -> (Vec<u16>, Vec<u16>) {
    let bits_per_chunk_c = ceil_log2(P::NUM_ROUNDS);
    let bits_per_chunk_p = ceil_log2(P::NUM_PARTIES);
    debug_assert!(bits_per_chunk_c >= 4);
    debug_assert!(bits_per_chunk_p >= 4);

    let mut h = digest.to_vec();

    let mut challenge_c = Vec::with_capacity(P::NUM_OPENED_ROUNDS);
    while challenge_c.len() < P::NUM_OPENED_ROUNDS {
        for chunk in bits_to_chunks(bits_per_chunk_c, &h) {
            if (chunk as usize) < P::NUM_ROUNDS {
                append_unique(&mut challenge_c, chunk);
            }
            if challenge_c.len() == P::NUM_OPENED_ROUNDS {
                break;
            }
        }
        // The digest state advances after every pass, including the last.
        rehash::<P>(&mut h);
    }

    let mut challenge_p = Vec::with_capacity(P::NUM_OPENED_ROUNDS);
    while challenge_p.len() < P::NUM_OPENED_ROUNDS {
        for chunk in bits_to_chunks(bits_per_chunk_p, &h) {
            if (chunk as usize) < P::NUM_PARTIES {
                challenge_p.push(chunk);
            }
            if challenge_p.len() == P::NUM_OPENED_ROUNDS {
                break;
            }
        }
        rehash::<P>(&mut h);
    }

    (challenge_c, challenge_p)
}

/// Compute the Fiat-Shamir challenge digest and expand it.
pub(crate) fn hcp<P: PicnicParameter>(
    round_commitments: &[Vec<u8>],
    h_cv: &[u8],
    salt: &[u8; SALT_SIZE],
    pub_key: &[u8],
    plaintext: &[u8],
    message: &[u8],
) -> (Vec<u8>, Vec<u16>, Vec<u16>) {
    debug_assert!(P::NUM_OPENED_ROUNDS < P::NUM_ROUNDS);

    let mut ctx = HashCtx::new(P::DIGEST_SIZE);
    for commitment in round_commitments {
        ctx.update(commitment);
    }
    ctx.update(h_cv);
    ctx.update(salt);
    ctx.update(pub_key);
    ctx.update(plaintext);
    ctx.update(message);
    let mut digest = vec![0u8; P::DIGEST_SIZE];
    ctx.finalize().squeeze(&mut digest);

    // The digest is published as part of the signature; it is public
    // from here on.
    let (challenge_c, challenge_p) = expand_challenge::<P>(&digest);
    (digest, challenge_c, challenge_p)
}

/// Rounds not selected by the challenge, ascending; these are the Merkle
/// leaves the verifier cannot recompute.
pub(crate) fn missing_leaves_list<P: PicnicParameter>(challenge_c: &[u16]) -> Vec<u16> {
    (0..P::NUM_ROUNDS as u16)
        .filter(|t| !challenge_c.contains(t))
        .collect()
}
