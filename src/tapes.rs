// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-round random tapes and broadcast message logs.
//!
//! Each of the N parties in a round owns one tape of uniform bits derived
//! from its seed. The first n bits of every tape are that party's share
//! of the input masks; each cipher round then occupies 2n bits: n fresh
//! wire-mask shares followed by n AND-helper shares. The pre-processing
//! step rewrites the last party's helper bits (the aux bits) so the
//! shared AND invariant holds.

use crate::bits::{get_bit, set_bit, xor_bytes};
use crate::hashing::HashCtxX4;
use crate::params::{PicnicParameter, SALT_SIZE};

pub(crate) struct RandomTapes {
    tapes: Vec<Vec<u8>>,
    /// Bit cursor for the online mask/helper stream.
    pub(crate) pos: usize,
    /// Bit cursor into `aux_bits` during pre-processing.
    pub(crate) aux_pos: usize,
    /// Corrected last-party helper bits, in forward gate order.
    pub(crate) aux_bits: Vec<u8>,
    /// XOR of all party tapes, taken before any aux correction.
    pub(crate) parity_tapes: Vec<u8>,
}

impl RandomTapes {
    /// Derive all N tapes for round `t` from the party seeds, four
    /// parties per batched XOF call.
    pub(crate) fn create<P: PicnicParameter>(
        seeds: &[u8],
        salt: &[u8; SALT_SIZE],
        t: u16,
    ) -> Self {
        debug_assert_eq!(P::NUM_PARTIES % 4, 0);
        debug_assert_eq!(seeds.len(), P::NUM_PARTIES * P::SEED_SIZE);

        let mut tapes = vec![vec![0u8; P::TAPE_SIZE]; P::NUM_PARTIES];
        for i in (0..P::NUM_PARTIES).step_by(4) {
            let mut ctx = HashCtxX4::new(P::DIGEST_SIZE);
            ctx.update4(core::array::from_fn(|k| {
                &seeds[(i + k) * P::SEED_SIZE..(i + k + 1) * P::SEED_SIZE]
            }));
            ctx.update1(salt);
            ctx.update_u16_le(t);
            ctx.update_u16s_le(core::array::from_fn(|k| (i + k) as u16));

            let quartet = &mut tapes[i..i + 4];
            let (t0, rest) = quartet.split_at_mut(1);
            let (t1, rest) = rest.split_at_mut(1);
            let (t2, t3) = rest.split_at_mut(1);
            ctx.finalize().squeeze4([
                t0[0].as_mut_slice(),
                t1[0].as_mut_slice(),
                t2[0].as_mut_slice(),
                t3[0].as_mut_slice(),
            ]);
        }

        Self {
            tapes,
            pos: 0,
            aux_pos: 0,
            aux_bits: vec![0u8; P::VIEW_SIZE],
            parity_tapes: vec![0u8; P::TAPE_SIZE],
        }
    }

    pub(crate) fn num_parties(&self) -> usize {
        self.tapes.len()
    }

    pub(crate) fn tape(&self, party: usize) -> &[u8] {
        &self.tapes[party]
    }

    pub(crate) fn tape_mut(&mut self, party: usize) -> &mut [u8] {
        &mut self.tapes[party]
    }

    /// XOR of all party tapes into `parity_tapes`.
    pub(crate) fn compute_parity(&mut self) {
        self.parity_tapes.fill(0);
        for tape in &self.tapes {
            xor_bytes(&mut self.parity_tapes, tape);
        }
    }

    /// Gather one bit per party at the current cursor into a share word
    /// (party j at bit j) and advance the cursor.
    pub(crate) fn read_share_word(&mut self) -> u64 {
        let pos = self.pos;
        let mut word = 0u64;
        for (j, tape) in self.tapes.iter().enumerate() {
            word |= u64::from(get_bit(tape, pos)) << j;
        }
        self.pos += 1;
        word
    }

    /// Gather `count` consecutive share words.
    pub(crate) fn read_share_words(&mut self, count: usize) -> Vec<u64> {
        (0..count).map(|_| self.read_share_word()).collect()
    }

    /// Zero out one party's entire tape.
    pub(crate) fn zero_tape(&mut self, party: usize) {
        self.tapes[party].fill(0);
    }

    /// Install transmitted aux bits into the last party's helper regions.
    pub(crate) fn set_aux_bits<P: PicnicParameter>(&mut self, aux: &[u8]) {
        let last = P::NUM_PARTIES - 1;
        let n = P::LOWMC_N;
        let mut in_bit = 0;
        for round in 0..P::LOWMC_R {
            for i in 0..n {
                set_bit(
                    &mut self.tapes[last],
                    n + 2 * n * round + i,
                    get_bit(aux, in_bit),
                );
                in_bit += 1;
            }
        }
    }
}

/// Broadcast logs for one round: every party appends one bit per AND
/// gate at a shared cursor. During verification the unopened party's log
/// is supplied by the signature and read back instead of written.
pub(crate) struct Msgs {
    logs: Vec<Vec<u8>>,
    pub(crate) pos: usize,
    pub(crate) unopened: Option<usize>,
}

impl Msgs {
    pub(crate) fn new<P: PicnicParameter>(unopened: Option<usize>) -> Self {
        Self {
            logs: vec![vec![0u8; P::VIEW_SIZE]; P::NUM_PARTIES],
            pos: 0,
            unopened,
        }
    }

    pub(crate) fn log(&self, party: usize) -> &[u8] {
        &self.logs[party]
    }

    pub(crate) fn set_log(&mut self, party: usize, data: &[u8]) {
        self.logs[party].copy_from_slice(data);
    }

    /// Record one broadcast bit per party at the shared cursor. The
    /// unopened party's bit is read from its supplied log and patched
    /// into the returned share word.
    pub(crate) fn broadcast(&mut self, shares: u64) -> u64 {
        let pos = self.pos;
        let mut word = shares;
        for (j, log) in self.logs.iter_mut().enumerate() {
            if self.unopened == Some(j) {
                let bit = get_bit(log, pos);
                word = (word & !(1u64 << j)) | (u64::from(bit) << j);
            } else {
                set_bit(log, pos, ((shares >> j) & 1) as u8);
            }
        }
        self.pos += 1;
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Picnic3L1;

    type P = Picnic3L1;
    const SALT: [u8; SALT_SIZE] = [1u8; SALT_SIZE];

    fn test_seeds() -> Vec<u8> {
        (0..P::NUM_PARTIES * P::SEED_SIZE)
            .map(|i| i as u8)
            .collect()
    }

    #[test]
    fn tape_derivation_is_deterministic_and_salted() {
        let seeds = test_seeds();
        let a = RandomTapes::create::<P>(&seeds, &SALT, 3);
        let b = RandomTapes::create::<P>(&seeds, &SALT, 3);
        for j in 0..P::NUM_PARTIES {
            assert_eq!(a.tape(j), b.tape(j));
        }

        let c = RandomTapes::create::<P>(&seeds, &SALT, 4);
        assert_ne!(a.tape(0), c.tape(0));

        let other_salt = [2u8; SALT_SIZE];
        let d = RandomTapes::create::<P>(&seeds, &other_salt, 3);
        assert_ne!(a.tape(0), d.tape(0));
    }

    #[test]
    fn parity_is_xor_of_all_tapes() {
        let mut tapes = RandomTapes::create::<P>(&test_seeds(), &SALT, 0);
        tapes.compute_parity();
        for pos in 0..P::TAPE_SIZE * 8 {
            let mut expected = 0u8;
            for j in 0..P::NUM_PARTIES {
                expected ^= get_bit(tapes.tape(j), pos);
            }
            assert_eq!(get_bit(&tapes.parity_tapes, pos), expected);
        }
    }

    #[test]
    fn share_words_gather_party_bits() {
        let mut tapes = RandomTapes::create::<P>(&test_seeds(), &SALT, 0);
        let word = tapes.read_share_word();
        assert_eq!(tapes.pos, 1);
        for j in 0..P::NUM_PARTIES {
            assert_eq!(((word >> j) & 1) as u8, get_bit(tapes.tape(j), 0));
        }
    }

    #[test]
    fn aux_bits_round_trip_through_tape_regions() {
        let mut tapes = RandomTapes::create::<P>(&test_seeds(), &SALT, 0);
        let mut aux = vec![0u8; P::VIEW_SIZE];
        for i in 0..P::LOWMC_R * P::LOWMC_N {
            set_bit(&mut aux, i, (i % 3 == 0) as u8);
        }
        tapes.set_aux_bits::<P>(&aux);

        let last = P::NUM_PARTIES - 1;
        let n = P::LOWMC_N;
        for round in 0..P::LOWMC_R {
            for i in 0..n {
                assert_eq!(
                    get_bit(tapes.tape(last), n + 2 * n * round + i),
                    get_bit(&aux, round * n + i),
                );
            }
        }
    }
}
