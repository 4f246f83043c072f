// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picnic3 signature verification.
//!
//! The verifier mirrors the signer round by round. For rounds the
//! challenge left unopened it re-derives every party seed from the
//! revealed round seed and recomputes the aux bits from scratch; for
//! opened rounds it reconstructs all party seeds but one, re-runs the
//! online simulation with the transmitted aux bits and broadcast log,
//! and takes the hidden party's commitment from the signature. It then
//! rebuilds the Merkle tree over the view commitments from the opened
//! leaves plus the transmitted nodes and recomputes the challenge.

use crate::challenge::{hcp, missing_leaves_list};
use crate::commit::{commit, commit_h, commit_h_x4, commit_v, commit_x4};
use crate::error::{Error, Result};
use crate::lowmc::{Lowmc, LowmcCircuit};
use crate::params::PicnicParameter;
use crate::proof::UnpackedSignature;
use crate::tapes::{Msgs, RandomTapes};
use crate::tree::Tree;
use subtle::ConstantTimeEq;

pub(crate) fn verify_picnic3<P: PicnicParameter>(
    sig: &UnpackedSignature,
    pub_key: &[u8],
    plaintext: &[u8],
    message: &[u8],
) -> Result<()> {
    let num_rounds = P::NUM_ROUNDS;
    let last = P::NUM_PARTIES - 1;
    let lowmc = Lowmc::<P>::expand();

    let mut iseeds_tree = Tree::new(num_rounds, P::SEED_SIZE);
    iseeds_tree.reconstruct_seeds::<P>(&sig.challenge_c, &sig.iseed_info, &sig.salt, 0)?;

    let mut tapes: Vec<RandomTapes> = Vec::with_capacity(num_rounds);
    let mut ch: Vec<Vec<u8>> = Vec::with_capacity(num_rounds);
    let mut commitment_buf: Vec<Vec<Vec<u8>>> = Vec::with_capacity(4);

    for t in 0..num_rounds as u16 {
        let opened_idx = sig.challenge_c.iter().position(|&c| c == t);

        let round_seeds = match opened_idx {
            None => {
                // The round seed is revealed; expand all party seeds.
                Tree::generate_seeds::<P>(P::NUM_PARTIES, iseeds_tree.leaf(t as usize), &sig.salt, t)
            }
            Some(idx) => {
                // All party seeds but the unopened one are revealed.
                let proof = sig.proofs[t as usize].as_ref().ok_or(Error::SeedReconstruct)?;
                let hide_list = [sig.challenge_p[idx]];
                let mut tree = Tree::new(P::NUM_PARTIES, P::SEED_SIZE);
                tree.reconstruct_seeds::<P>(&hide_list, &proof.seed_info, &sig.salt, t)?;
                tree
            }
        };

        // The unopened party's slot holds a bogus seed; its tape is
        // never used.
        let mut round_tapes = RandomTapes::create::<P>(round_seeds.leaves(), &sig.salt, t);

        let mut round_commitments: Vec<Vec<u8>> = Vec::with_capacity(P::NUM_PARTIES);
        match opened_idx {
            None => {
                // Recompute the aux bits from scratch to commit as the
                // signer did.
                lowmc.compute_aux(&mut round_tapes, None);
                for j in (0..P::NUM_PARTIES).step_by(4) {
                    round_commitments.extend(commit_x4::<P>(
                        core::array::from_fn(|k| round_seeds.leaf(j + k)),
                        &sig.salt,
                        t,
                        j as u16,
                    ));
                }
                round_commitments[last] = commit::<P>(
                    round_seeds.leaf(last),
                    Some(&round_tapes.aux_bits),
                    &sig.salt,
                    t,
                    last as u16,
                );
            }
            Some(idx) => {
                let proof = sig.proofs[t as usize].as_ref().ok_or(Error::SeedReconstruct)?;
                let unopened = sig.challenge_p[idx] as usize;
                for j in (0..P::NUM_PARTIES).step_by(4) {
                    round_commitments.extend(commit_x4::<P>(
                        core::array::from_fn(|k| round_seeds.leaf(j + k)),
                        &sig.salt,
                        t,
                        j as u16,
                    ));
                }
                if last != unopened {
                    round_commitments[last] = commit::<P>(
                        round_seeds.leaf(last),
                        Some(&proof.aux),
                        &sig.salt,
                        t,
                        last as u16,
                    );
                }
                round_commitments[unopened] = proof.commitment.clone();
            }
        }

        // Hash round commitments in quartets where possible; the tail
        // rounds past the last full quartet are hashed singly.
        let t = t as usize;
        if t >= num_rounds / 4 * 4 {
            ch.push(commit_h::<P>(&round_commitments));
        } else {
            commitment_buf.push(round_commitments);
            if (t + 1) % 4 == 0 {
                ch.extend(commit_h_x4::<P>(core::array::from_fn(|k| {
                    commitment_buf[k].as_slice()
                })));
                commitment_buf.clear();
            }
        }

        tapes.push(round_tapes);
    }

    // Re-run the online simulation for every opened round and commit to
    // the resulting views.
    let mut cv: Vec<Option<Vec<u8>>> = (0..num_rounds).map(|_| None).collect();
    for (idx, &t) in sig.challenge_c.iter().enumerate() {
        let round = t as usize;
        let proof = sig.proofs[round].as_ref().ok_or(Error::SeedReconstruct)?;
        let unopened = sig.challenge_p[idx] as usize;

        let round_tapes = &mut tapes[round];
        round_tapes.set_aux_bits::<P>(&proof.aux);
        round_tapes.zero_tape(unopened);

        let mut msgs = Msgs::new::<P>(Some(unopened));
        msgs.set_log(unopened, &proof.msgs);

        lowmc.simulate_online(&proof.input, round_tapes, &mut msgs, plaintext, pub_key)?;
        cv[round] = Some(commit_v::<P>(&proof.input, &msgs));
    }

    // Fill in the view commitments of unopened rounds from the Merkle
    // opening and check the tree reconstructs.
    let missing_leaves = missing_leaves_list::<P>(&sig.challenge_c);
    let mut tree_cv = Tree::new(num_rounds, P::DIGEST_SIZE);
    tree_cv.add_merkle_nodes(&missing_leaves, &sig.cv_info)?;
    tree_cv.verify_merkle_tree::<P>(&cv, &sig.salt)?;

    let (challenge, _, _) = hcp::<P>(&ch, tree_cv.root(), &sig.salt, pub_key, plaintext, message);
    if challenge.ct_eq(&sig.challenge).into() {
        Ok(())
    } else {
        Err(Error::ChallengeMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{get_bit, set_bit};
    use crate::params::Picnic3L1;
    use crate::sign::sign_picnic3;

    type P = Picnic3L1;

    fn test_keys() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let lowmc = Lowmc::<P>::expand();
        let mut secret_key = vec![0u8; P::INPUT_OUTPUT_SIZE];
        let mut plaintext = vec![0u8; P::INPUT_OUTPUT_SIZE];
        for i in 0..P::LOWMC_N {
            set_bit(&mut secret_key, i, ((i % 3) == 0) as u8);
            set_bit(&mut plaintext, i, ((i % 4) == 1) as u8);
        }
        let mut ciphertext = vec![0u8; P::INPUT_OUTPUT_SIZE];
        lowmc.encrypt(&secret_key, &plaintext, &mut ciphertext);
        (secret_key, ciphertext, plaintext)
    }

    #[test]
    fn honest_signature_verifies() {
        let (sk, pk, pt) = test_keys();
        let sig = sign_picnic3::<P>(&sk, &pk, &pt, b"verify me").expect("sign");
        verify_picnic3::<P>(&sig, &pk, &pt, b"verify me").expect("verify");
    }

    #[test]
    fn wrong_message_fails_with_challenge_mismatch() {
        let (sk, pk, pt) = test_keys();
        let sig = sign_picnic3::<P>(&sk, &pk, &pt, b"signed message").expect("sign");
        let err = verify_picnic3::<P>(&sig, &pk, &pt, b"other message").unwrap_err();
        assert!(matches!(err, Error::ChallengeMismatch));
    }

    #[test]
    fn tampered_iseed_info_fails() {
        let (sk, pk, pt) = test_keys();
        let mut sig = sign_picnic3::<P>(&sk, &pk, &pt, b"iseed tamper").expect("sign");
        sig.iseed_info[0] ^= 1;
        let err = verify_picnic3::<P>(&sig, &pk, &pt, b"iseed tamper").unwrap_err();
        assert!(matches!(err, Error::ChallengeMismatch));
    }

    #[test]
    fn tampered_cv_info_fails() {
        let (sk, pk, pt) = test_keys();
        let mut sig = sign_picnic3::<P>(&sk, &pk, &pt, b"cv tamper").expect("sign");
        sig.cv_info[0] ^= 1;
        let err = verify_picnic3::<P>(&sig, &pk, &pt, b"cv tamper").unwrap_err();
        assert!(matches!(err, Error::ChallengeMismatch));
    }

    #[test]
    fn tampered_broadcast_log_fails_in_simulation() {
        let (sk, pk, pt) = test_keys();
        let mut sig = sign_picnic3::<P>(&sk, &pk, &pt, b"msgs tamper").expect("sign");
        let t = sig.challenge_c[0] as usize;
        let proof = sig.proofs[t].as_mut().unwrap();
        // Flip a declared (non-padding) bit of the unopened party's log.
        let bit = get_bit(&proof.msgs, 0);
        set_bit(&mut proof.msgs, 0, bit ^ 1);
        let err = verify_picnic3::<P>(&sig, &pk, &pt, b"msgs tamper").unwrap_err();
        assert!(matches!(err, Error::MpcInconsistent));
    }

    #[test]
    fn tampered_unopened_commitment_fails() {
        let (sk, pk, pt) = test_keys();
        let mut sig = sign_picnic3::<P>(&sk, &pk, &pt, b"commitment tamper").expect("sign");
        let t = sig.challenge_c[0] as usize;
        sig.proofs[t].as_mut().unwrap().commitment[0] ^= 1;
        let err = verify_picnic3::<P>(&sig, &pk, &pt, b"commitment tamper").unwrap_err();
        assert!(matches!(err, Error::ChallengeMismatch));
    }

    #[test]
    fn signing_is_deterministic() {
        let (sk, pk, pt) = test_keys();
        let a = sign_picnic3::<P>(&sk, &pk, &pt, b"deterministic").expect("sign");
        let b = sign_picnic3::<P>(&sk, &pk, &pt, b"deterministic").expect("sign");
        assert_eq!(a.serialize::<P>(), b.serialize::<P>());
    }
}
