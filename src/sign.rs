// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picnic3 signature generation.

use crate::bits::{set_bit, xor_bytes};
use crate::challenge::{hcp, missing_leaves_list};
use crate::commit::{commit, commit_h, commit_h_x4, commit_v, commit_v_x4, commit_x4};
use crate::error::Result;
use crate::hashing::HashCtx;
use crate::lowmc::{Lowmc, LowmcCircuit};
use crate::params::{PicnicParameter, SALT_SIZE};
use crate::proof::{Proof, UnpackedSignature};
use crate::tapes::{Msgs, RandomTapes};
use crate::tree::Tree;

/// Derive the salt and the root seed of the per-round seed tree. Binding
/// the private key makes signing deterministic per (key, message) pair.
fn compute_salt_and_root_seed<P: PicnicParameter>(
    private_key: &[u8],
    pub_key: &[u8],
    plaintext: &[u8],
    message: &[u8],
) -> ([u8; SALT_SIZE], Vec<u8>) {
    let mut ctx = HashCtx::new(P::DIGEST_SIZE);
    ctx.update(private_key);
    ctx.update(message);
    ctx.update(pub_key);
    ctx.update(plaintext);
    ctx.update_u16_le(P::LOWMC_N as u16);

    let mut salt_and_root = vec![0u8; SALT_SIZE + P::SEED_SIZE];
    ctx.finalize().squeeze(&mut salt_and_root);

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&salt_and_root[..SALT_SIZE]);
    (salt, salt_and_root[SALT_SIZE..].to_vec())
}

/// Produce a signature over `message` for the keypair
/// (`private_key`, `pub_key` = LowMC(private_key, `plaintext`)).
pub(crate) fn sign_picnic3<P: PicnicParameter>(
    private_key: &[u8],
    pub_key: &[u8],
    plaintext: &[u8],
    message: &[u8],
) -> Result<UnpackedSignature> {
    debug_assert_eq!(P::NUM_PARTIES % 4, 0);
    let num_rounds = P::NUM_ROUNDS;
    let last = P::NUM_PARTIES - 1;
    let lowmc = Lowmc::<P>::expand();

    let (salt, root_seed) =
        compute_salt_and_root_seed::<P>(private_key, pub_key, plaintext, message);
    let iseeds_tree = Tree::generate_seeds::<P>(num_rounds, &root_seed, &salt, 0);

    let mut seeds: Vec<Tree> = Vec::with_capacity(num_rounds);
    let mut tapes: Vec<RandomTapes> = Vec::with_capacity(num_rounds);
    let mut inputs: Vec<Vec<u8>> = vec![vec![0u8; P::INPUT_OUTPUT_SIZE]; num_rounds];
    let mut commitments_c: Vec<Vec<Vec<u8>>> = Vec::with_capacity(num_rounds);

    for t in 0..num_rounds {
        let round_seeds =
            Tree::generate_seeds::<P>(P::NUM_PARTIES, iseeds_tree.leaf(t), &salt, t as u16);
        let mut round_tapes = RandomTapes::create::<P>(round_seeds.leaves(), &salt, t as u16);
        lowmc.compute_aux(&mut round_tapes, Some(&mut inputs[t]));

        // Commit to seeds in quartets; the last party's commitment also
        // binds the aux bits and replaces its quartet entry.
        let mut round_commitments: Vec<Vec<u8>> = Vec::with_capacity(P::NUM_PARTIES);
        for j in (0..P::NUM_PARTIES).step_by(4) {
            let quartet = commit_x4::<P>(
                core::array::from_fn(|k| round_seeds.leaf(j + k)),
                &salt,
                t as u16,
                j as u16,
            );
            round_commitments.extend(quartet);
        }
        round_commitments[last] = commit::<P>(
            round_seeds.leaf(last),
            Some(&round_tapes.aux_bits),
            &salt,
            t as u16,
            last as u16,
        );

        seeds.push(round_seeds);
        tapes.push(round_tapes);
        commitments_c.push(round_commitments);
    }

    // Online phase: mask the key and simulate the MPC for every round.
    let mut msgs: Vec<Msgs> = Vec::with_capacity(num_rounds);
    for t in 0..num_rounds {
        let masked_key = &mut inputs[t];
        xor_bytes(masked_key, private_key);
        for i in P::LOWMC_N..P::INPUT_OUTPUT_SIZE * 8 {
            set_bit(masked_key, i, 0);
        }

        let mut round_msgs = Msgs::new::<P>(None);
        lowmc.simulate_online(
            masked_key,
            &mut tapes[t],
            &mut round_msgs,
            plaintext,
            pub_key,
        )?;
        msgs.push(round_msgs);
    }

    // Commit to the commitments and views, four rounds at a time.
    let mut ch: Vec<Vec<u8>> = Vec::with_capacity(num_rounds);
    let mut cv: Vec<Vec<u8>> = Vec::with_capacity(num_rounds);
    let mut t = 0;
    while t + 4 <= num_rounds {
        ch.extend(commit_h_x4::<P>(core::array::from_fn(|k| {
            commitments_c[t + k].as_slice()
        })));
        cv.extend(commit_v_x4::<P>(
            core::array::from_fn(|k| inputs[t + k].as_slice()),
            core::array::from_fn(|k| &msgs[t + k]),
        ));
        t += 4;
    }
    while t < num_rounds {
        ch.push(commit_h::<P>(&commitments_c[t]));
        cv.push(commit_v::<P>(&inputs[t], &msgs[t]));
        t += 1;
    }

    let mut tree_cv = Tree::new(num_rounds, P::DIGEST_SIZE);
    tree_cv.build_merkle_tree::<P>(&cv, &salt);

    let (challenge, challenge_c, challenge_p) =
        hcp::<P>(&ch, tree_cv.root(), &salt, pub_key, plaintext, message);

    let missing_leaves = missing_leaves_list::<P>(&challenge_c);
    let cv_info = tree_cv.open_merkle_tree(&missing_leaves);
    let iseed_info = iseeds_tree.reveal_seeds(&challenge_c);

    let mut proofs: Vec<Option<Proof>> = (0..num_rounds).map(|_| None).collect();
    for t in 0..num_rounds as u16 {
        let Some(idx) = challenge_c.iter().position(|&c| c == t) else {
            continue;
        };
        let unopened = challenge_p[idx] as usize;
        let round = t as usize;

        let seed_info = seeds[round].reveal_seeds(&[unopened as u16]);
        let aux = if unopened != last {
            tapes[round].aux_bits.clone()
        } else {
            vec![0u8; P::VIEW_SIZE]
        };

        // Recompute the unopened party's commitment; it binds the aux
        // bits exactly when the unopened party is the last one.
        let commitment = if unopened == last {
            commit::<P>(
                seeds[round].leaf(unopened),
                Some(&tapes[round].aux_bits),
                &salt,
                t,
                unopened as u16,
            )
        } else {
            commit::<P>(seeds[round].leaf(unopened), None, &salt, t, unopened as u16)
        };

        proofs[round] = Some(Proof {
            seed_info,
            aux,
            input: inputs[round].clone(),
            msgs: msgs[round].log(unopened).to_vec(),
            commitment,
            unopened_index: unopened as u16,
        });
    }

    Ok(UnpackedSignature {
        challenge,
        salt,
        iseed_info,
        cv_info,
        challenge_c,
        challenge_p,
        proofs,
    })
}
