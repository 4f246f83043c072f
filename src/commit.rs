// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Commitment layers: per-party seed commitments C[t][j], per-round
//! commitments Ch[t] over all party commitments, and per-round view
//! commitments Cv[t] over the masked input and broadcast logs.

use crate::hashing::{HashCtx, HashCtxX4};
use crate::params::{PicnicParameter, SALT_SIZE};
use crate::tapes::Msgs;

/// C[t][j] = H(seed || [aux] || salt || t || j). Only the last party's
/// commitment binds the aux bits.
pub(crate) fn commit<P: PicnicParameter>(
    seed: &[u8],
    aux: Option<&[u8]>,
    salt: &[u8; SALT_SIZE],
    t: u16,
    j: u16,
) -> Vec<u8> {
    let mut ctx = HashCtx::new(P::DIGEST_SIZE);
    ctx.update(seed);
    if let Some(aux) = aux {
        ctx.update(aux);
    }
    ctx.update(salt);
    ctx.update_u16_le(t);
    ctx.update_u16_le(j);
    let mut digest = vec![0u8; P::DIGEST_SIZE];
    ctx.finalize().squeeze(&mut digest);
    digest
}

/// Batched C[t][j..j+4] for four aux-free parties.
pub(crate) fn commit_x4<P: PicnicParameter>(
    seeds: [&[u8]; 4],
    salt: &[u8; SALT_SIZE],
    t: u16,
    j: u16,
) -> [Vec<u8>; 4] {
    let mut ctx = HashCtxX4::new(P::DIGEST_SIZE);
    ctx.update4(seeds);
    ctx.update1(salt);
    ctx.update_u16_le(t);
    ctx.update_u16s_le([j, j + 1, j + 2, j + 3]);

    let mut digests = core::array::from_fn(|_| vec![0u8; P::DIGEST_SIZE]);
    {
        let [d0, d1, d2, d3] = &mut digests;
        ctx.finalize().squeeze4([
            d0.as_mut_slice(),
            d1.as_mut_slice(),
            d2.as_mut_slice(),
            d3.as_mut_slice(),
        ]);
    }
    digests
}

/// Ch[t] = H(C[t][0] || ... || C[t][N-1]).
pub(crate) fn commit_h<P: PicnicParameter>(party_commitments: &[Vec<u8>]) -> Vec<u8> {
    let mut ctx = HashCtx::new(P::DIGEST_SIZE);
    for commitment in party_commitments {
        ctx.update(commitment);
    }
    let mut digest = vec![0u8; P::DIGEST_SIZE];
    ctx.finalize().squeeze(&mut digest);
    digest
}

/// Batched Ch for a quartet of rounds.
pub(crate) fn commit_h_x4<P: PicnicParameter>(
    round_commitments: [&[Vec<u8>]; 4],
) -> [Vec<u8>; 4] {
    let mut ctx = HashCtxX4::new(P::DIGEST_SIZE);
    for i in 0..P::NUM_PARTIES {
        ctx.update4(core::array::from_fn(|k| {
            round_commitments[k][i].as_slice()
        }));
    }
    let mut digests = core::array::from_fn(|_| vec![0u8; P::DIGEST_SIZE]);
    {
        let [d0, d1, d2, d3] = &mut digests;
        ctx.finalize().squeeze4([
            d0.as_mut_slice(),
            d1.as_mut_slice(),
            d2.as_mut_slice(),
            d3.as_mut_slice(),
        ]);
    }
    digests
}

/// Cv[t] = H(input || msgs[0] || ... || msgs[N-1]).
pub(crate) fn commit_v<P: PicnicParameter>(input: &[u8], msgs: &Msgs) -> Vec<u8> {
    let msg_bytes = msgs.pos.div_ceil(8);
    let mut ctx = HashCtx::new(P::DIGEST_SIZE);
    ctx.update(input);
    for i in 0..P::NUM_PARTIES {
        ctx.update(&msgs.log(i)[..msg_bytes]);
    }
    let mut digest = vec![0u8; P::DIGEST_SIZE];
    ctx.finalize().squeeze(&mut digest);
    digest
}

/// Batched Cv for a quartet of rounds.
pub(crate) fn commit_v_x4<P: PicnicParameter>(
    inputs: [&[u8]; 4],
    msgs: [&Msgs; 4],
) -> [Vec<u8>; 4] {
    assert!(
        msgs[0].pos == msgs[1].pos && msgs[1].pos == msgs[2].pos && msgs[2].pos == msgs[3].pos
    );
    let msg_bytes = msgs[0].pos.div_ceil(8);

    let mut ctx = HashCtxX4::new(P::DIGEST_SIZE);
    ctx.update4(inputs);
    for i in 0..P::NUM_PARTIES {
        ctx.update4(core::array::from_fn(|k| &msgs[k].log(i)[..msg_bytes]));
    }
    let mut digests = core::array::from_fn(|_| vec![0u8; P::DIGEST_SIZE]);
    {
        let [d0, d1, d2, d3] = &mut digests;
        ctx.finalize().squeeze4([
            d0.as_mut_slice(),
            d1.as_mut_slice(),
            d2.as_mut_slice(),
            d3.as_mut_slice(),
        ]);
    }
    digests
}
