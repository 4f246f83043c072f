// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Signature structure and its bit-exact wire format.
//!
//! The wire layout is: challenge digest, salt, revealed root-seed data
//! for unopened rounds, Merkle opening for the missing view commitments,
//! then for each opened round in ascending order the revealed party
//! seeds, the aux bits (omitted when the unopened party is the last
//! one), the masked input, the unopened party's broadcast log, and the
//! unopened party's commitment.
//!
//! Deserialization first recovers the challenge lists from the digest,
//! derives the exact byte length they imply, and rejects any input whose
//! length differs. Trailing padding bits of the bit-packed fields must
//! be zero.

use crate::challenge::{expand_challenge, missing_leaves_list};
use crate::error::{Error, Result};
use crate::params::{PicnicParameter, SALT_SIZE};
use crate::tree::Tree;

/// Opened-round data carried by a signature.
#[derive(Debug)]
pub(crate) struct Proof {
    /// Revealed seed-tree nodes covering all parties but the unopened one.
    pub(crate) seed_info: Vec<u8>,
    /// Aux bits for the last party; all-zero when the unopened party is
    /// the last one (the field is then absent on the wire).
    pub(crate) aux: Vec<u8>,
    /// Masked key input for the online evaluation.
    pub(crate) input: Vec<u8>,
    /// Broadcast log of the unopened party.
    pub(crate) msgs: Vec<u8>,
    /// Commitment of the unopened party.
    pub(crate) commitment: Vec<u8>,
    /// Index of the unopened party.
    pub(crate) unopened_index: u16,
}

/// A parsed signature; `proofs[t]` is present iff round `t` is opened.
#[derive(Debug)]
pub(crate) struct UnpackedSignature {
    pub(crate) challenge: Vec<u8>,
    pub(crate) salt: [u8; SALT_SIZE],
    pub(crate) iseed_info: Vec<u8>,
    pub(crate) cv_info: Vec<u8>,
    pub(crate) challenge_c: Vec<u16>,
    pub(crate) challenge_p: Vec<u16>,
    pub(crate) proofs: Vec<Option<Proof>>,
}

impl UnpackedSignature {
    /// Total serialized byte length of this signature.
    pub(crate) fn required_size<P: PicnicParameter>(&self) -> usize {
        let last = (P::NUM_PARTIES - 1) as u16;
        let mut bytes = P::DIGEST_SIZE + SALT_SIZE + self.iseed_info.len() + self.cv_info.len();
        for proof in self.proofs.iter().flatten() {
            bytes += proof.seed_info.len();
            if proof.unopened_index != last {
                bytes += P::VIEW_SIZE;
            }
            bytes += P::INPUT_OUTPUT_SIZE + P::VIEW_SIZE + P::DIGEST_SIZE;
        }
        bytes
    }

    pub(crate) fn serialize<P: PicnicParameter>(&self) -> Vec<u8> {
        let last = (P::NUM_PARTIES - 1) as u16;
        let mut out = Vec::with_capacity(self.required_size::<P>());
        out.extend_from_slice(&self.challenge);
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.iseed_info);
        out.extend_from_slice(&self.cv_info);
        for proof in self.proofs.iter().flatten() {
            out.extend_from_slice(&proof.seed_info);
            if proof.unopened_index != last {
                out.extend_from_slice(&proof.aux);
            }
            out.extend_from_slice(&proof.input);
            out.extend_from_slice(&proof.msgs);
            out.extend_from_slice(&proof.commitment);
        }
        out
    }

    pub(crate) fn deserialize<P: PicnicParameter>(bytes: &[u8]) -> Result<Self> {
        let header = P::DIGEST_SIZE + SALT_SIZE;
        if bytes.len() < header {
            return Err(Error::InvalidSignatureLength {
                expected: header,
                got: bytes.len(),
            });
        }

        let challenge = bytes[..P::DIGEST_SIZE].to_vec();
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&bytes[P::DIGEST_SIZE..header]);

        let (challenge_c, challenge_p) = expand_challenge::<P>(&challenge);

        let iseed_info_len = Tree::reveal_seeds_size::<P>(P::NUM_ROUNDS, &challenge_c);
        let missing_leaves = missing_leaves_list::<P>(&challenge_c);
        let cv_info_len = Tree::open_merkle_tree_size::<P>(P::NUM_ROUNDS, &missing_leaves);
        // Same length for every hidden party in a complete tree.
        let seed_info_len = Tree::reveal_seeds_size::<P>(P::NUM_PARTIES, &[0]);

        let last = (P::NUM_PARTIES - 1) as u16;
        let mut required = header + iseed_info_len + cv_info_len;
        for &p in &challenge_p {
            if p != last {
                required += P::VIEW_SIZE;
            }
            required += seed_info_len + P::INPUT_OUTPUT_SIZE + P::VIEW_SIZE + P::DIGEST_SIZE;
        }
        if bytes.len() != required {
            return Err(Error::InvalidSignatureLength {
                expected: required,
                got: bytes.len(),
            });
        }

        let mut cursor = header;
        let mut take = |len: usize| {
            let slice = &bytes[cursor..cursor + len];
            cursor += len;
            slice
        };

        let iseed_info = take(iseed_info_len).to_vec();
        let cv_info = take(cv_info_len).to_vec();

        let mut proofs: Vec<Option<Proof>> = (0..P::NUM_ROUNDS).map(|_| None).collect();
        for t in 0..P::NUM_ROUNDS as u16 {
            let Some(idx) = challenge_c.iter().position(|&c| c == t) else {
                continue;
            };
            let unopened_index = challenge_p[idx];

            let seed_info = take(seed_info_len).to_vec();
            let aux = if unopened_index != last {
                let aux = take(P::VIEW_SIZE).to_vec();
                if !crate::bits::padding_bits_zero(&aux, P::AND_BITS) {
                    return Err(Error::BadPadding);
                }
                aux
            } else {
                vec![0u8; P::VIEW_SIZE]
            };

            let input = take(P::INPUT_OUTPUT_SIZE).to_vec();
            if !crate::bits::padding_bits_zero(&input, P::LOWMC_N) {
                return Err(Error::BadPadding);
            }

            let msgs = take(P::VIEW_SIZE).to_vec();
            if !crate::bits::padding_bits_zero(&msgs, P::AND_BITS) {
                return Err(Error::BadPadding);
            }

            let commitment = take(P::DIGEST_SIZE).to_vec();

            proofs[t as usize] = Some(Proof {
                seed_info,
                aux,
                input,
                msgs,
                commitment,
                unopened_index,
            });
        }
        debug_assert_eq!(cursor, required);

        Ok(Self {
            challenge,
            salt,
            iseed_info,
            cv_info,
            challenge_c,
            challenge_p,
            proofs,
        })
    }
}
