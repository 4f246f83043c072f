// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LowMC circuit evaluation for the MPC-in-the-Head protocol.
//!
//! The cipher has an n-bit state, a full S-box layer (n = 3m) and r
//! rounds: whitening with the key, then per round S-box, linear layer,
//! round constant, and round key. The round matrices and constants are
//! expanded deterministically from a domain-separated SHAKE256 stream;
//! linear layers are drawn until invertible so the inverse needed by
//! pre-processing exists.
//!
//! Three evaluations share the circuit description:
//!   - [`LowmcCircuit::encrypt`], the plain cipher (key generation),
//!   - [`LowmcCircuit::compute_aux`], the pre-processing walk that
//!     corrects the last party's AND-helper bits so the additive sharing
//!     of every AND gate is consistent,
//!   - [`LowmcCircuit::simulate_online`], the N-party masked evaluation
//!     producing the broadcast logs.
//!
//! Output wire masks for the final round are derived so the mask of the
//! cipher output is identically zero, which lets the simulator compare
//! its masked output directly against the public ciphertext.

use crate::bits::{
    get_bit, set_bit, word_dot, word_get_bit, word_set_bit, word_xor, words_from_bytes,
    words_to_bytes, Words, STATE_WORDS,
};
use crate::error::{Error, Result};
use crate::params::PicnicParameter;
use crate::tapes::{Msgs, RandomTapes};
use core::marker::PhantomData;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;
use subtle::ConstantTimeEq;

/// The two LowMC operations the signer and verifier consume, plus the
/// plain cipher used by key generation.
pub(crate) trait LowmcCircuit {
    /// Correct the last party's AND-helper tape bits and record them in
    /// `tapes.aux_bits`; optionally write out the shared key mask.
    fn compute_aux(&self, tapes: &mut RandomTapes, input_masks: Option<&mut [u8]>);

    /// Run the masked N-party evaluation, recording one broadcast bit
    /// per party per AND gate. Fails iff the unmasked output disagrees
    /// with `pub_key`.
    fn simulate_online(
        &self,
        masked_key: &[u8],
        tapes: &mut RandomTapes,
        msgs: &mut Msgs,
        plaintext: &[u8],
        pub_key: &[u8],
    ) -> Result<()>;

    /// Plain LowMC encryption.
    fn encrypt(&self, key: &[u8], plaintext: &[u8], output: &mut [u8]);
}

/// An n x n matrix over GF(2); `rows[i]` dotted with a vector gives
/// output bit i.
struct Matrix {
    rows: Vec<Words>,
}

impl Matrix {
    fn from_xof(reader: &mut impl XofReader, n: usize, row_bytes: usize) -> Self {
        let rows = (0..n).map(|_| read_block(reader, n, row_bytes)).collect();
        Self { rows }
    }

    fn mul(&self, v: &Words) -> Words {
        let mut out = [0u64; STATE_WORDS];
        for (i, row) in self.rows.iter().enumerate() {
            word_set_bit(&mut out, i, word_dot(row, v));
        }
        out
    }

    /// Gauss-Jordan inverse; `None` when singular.
    fn invert(&self, n: usize) -> Option<Self> {
        let mut a = self.rows.clone();
        let mut inv: Vec<Words> = (0..n)
            .map(|i| {
                let mut row = [0u64; STATE_WORDS];
                word_set_bit(&mut row, i, 1);
                row
            })
            .collect();

        for col in 0..n {
            let pivot = (col..n).find(|&r| word_get_bit(&a[r], col) == 1)?;
            a.swap(col, pivot);
            inv.swap(col, pivot);
            for r in 0..n {
                if r != col && word_get_bit(&a[r], col) == 1 {
                    a[r] = word_xor(&a[r], &a[col]);
                    inv[r] = word_xor(&inv[r], &inv[col]);
                }
            }
        }
        Some(Self { rows: inv })
    }
}

struct Round {
    linear: Matrix,
    linear_inv: Matrix,
    key: Matrix,
    constant: Words,
}

/// A concrete LowMC instance for parameter set `P`.
pub(crate) struct Lowmc<P: PicnicParameter> {
    rounds: Vec<Round>,
    _marker: PhantomData<P>,
}

/// Read an n-bit block, zeroing the padding bits of the last byte.
fn read_block(reader: &mut impl XofReader, n: usize, block_bytes: usize) -> Words {
    let mut bytes = vec![0u8; block_bytes];
    reader.read(&mut bytes);
    let padding = block_bytes * 8 - n;
    bytes[block_bytes - 1] &= !(((1u16 << padding) - 1) as u8);
    words_from_bytes(&bytes)
}

/// Zero bits n and above of a state vector.
fn mask_padding<P: PicnicParameter>(words: &mut Words) {
    for i in P::LOWMC_N..P::INPUT_OUTPUT_SIZE * 8 {
        word_set_bit(words, i, 0);
    }
}

fn gather_bits(bytes: &[u8], base: usize, count: usize) -> Words {
    let mut out = [0u64; STATE_WORDS];
    for i in 0..count {
        word_set_bit(&mut out, i, get_bit(bytes, base + i));
    }
    out
}

#[inline]
fn bit_spread(bit: u8) -> u64 {
    0u64.wrapping_sub(u64::from(bit))
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn share_parity(word: u64, num_parties: usize) -> u8 {
    let mask = if num_parties == 64 {
        u64::MAX
    } else {
        (1u64 << num_parties) - 1
    };
    ((word & mask).count_ones() & 1) as u8
}

/// S-box over one 3-bit group: (a, b, c) -> (a^bc, a^b^ca, a^b^c^ab).
fn sbox_layer(state: &mut Words, num_sboxes: usize) {
    for s in 0..num_sboxes {
        let i = 3 * s;
        let a = word_get_bit(state, i);
        let b = word_get_bit(state, i + 1);
        let c = word_get_bit(state, i + 2);
        word_set_bit(state, i, a ^ (b & c));
        word_set_bit(state, i + 1, a ^ b ^ (c & a));
        word_set_bit(state, i + 2, a ^ b ^ c ^ (a & b));
    }
}

/// Fix the last party's helper bit at `tape_pos` so the corrected parity
/// over all parties equals `product ^ fresh_mask`, and record it.
fn aux_and(tapes: &mut RandomTapes, last: usize, tape_pos: usize, product: u8, fresh_mask: u8) {
    let others = get_bit(&tapes.parity_tapes, tape_pos) ^ get_bit(tapes.tape(last), tape_pos);
    let aux = product ^ fresh_mask ^ others;
    set_bit(tapes.tape_mut(last), tape_pos, aux);
    let aux_pos = tapes.aux_pos;
    set_bit(&mut tapes.aux_bits, aux_pos, aux);
    tapes.aux_pos += 1;
}

/// One AND gate of the masked evaluation: consumes a helper share word,
/// broadcasts every party's message bit, and returns the masked output.
fn mpc_and(
    a: u8,
    b: u8,
    mask_a: u64,
    mask_b: u64,
    tapes: &mut RandomTapes,
    msgs: &mut Msgs,
    num_parties: usize,
) -> u8 {
    let helper = tapes.read_share_word();
    let shares = (mask_b & bit_spread(a)) ^ (mask_a & bit_spread(b)) ^ helper;
    let shares = msgs.broadcast(shares);
    (a & b) ^ share_parity(shares, num_parties)
}

impl<P: PicnicParameter> Lowmc<P> {
    /// Expand the instance matrices from the parameter dimensions.
    pub(crate) fn expand() -> Self {
        let n = P::LOWMC_N;
        let block_bytes = P::INPUT_OUTPUT_SIZE;

        let mut hasher = Shake256::default();
        hasher.update(b"picnic3-lowmc-instance");
        hasher.update(&(n as u16).to_le_bytes());
        hasher.update(&(P::LOWMC_R as u16).to_le_bytes());
        let mut reader = hasher.finalize_xof();

        let rounds = (0..P::LOWMC_R)
            .map(|_| {
                let (linear, linear_inv) = loop {
                    let candidate = Matrix::from_xof(&mut reader, n, block_bytes);
                    if let Some(inverse) = candidate.invert(n) {
                        break (candidate, inverse);
                    }
                };
                let key = Matrix::from_xof(&mut reader, n, block_bytes);
                let constant = read_block(&mut reader, n, block_bytes);
                Round {
                    linear,
                    linear_inv,
                    key,
                    constant,
                }
            })
            .collect();

        Self {
            rounds,
            _marker: PhantomData,
        }
    }
}

impl<P: PicnicParameter> LowmcCircuit for Lowmc<P> {
    fn compute_aux(&self, tapes: &mut RandomTapes, input_masks: Option<&mut [u8]>) {
        let n = P::LOWMC_N;
        let r = P::LOWMC_R;
        let last = P::NUM_PARTIES - 1;

        tapes.compute_parity();
        let mut lambda_key = words_from_bytes(&tapes.parity_tapes[..P::INPUT_OUTPUT_SIZE]);
        mask_padding::<P>(&mut lambda_key);

        // Round 1 masks its S-box input with the key masks; later rounds
        // draw fresh wire masks from the tapes.
        let mut lambda_in = vec![[0u64; STATE_WORDS]; r + 1];
        lambda_in[1] = lambda_key;
        for jr in 2..=r {
            lambda_in[jr] = gather_bits(&tapes.parity_tapes, 2 * n * (jr - 1), n);
        }

        // S-box output masks, derived backward from a zero output mask.
        let mut lambda_out = vec![[0u64; STATE_WORDS]; r + 1];
        let mut after = [0u64; STATE_WORDS];
        for jr in (1..=r).rev() {
            after = word_xor(&after, &self.rounds[jr - 1].key.mul(&lambda_key));
            lambda_out[jr] = self.rounds[jr - 1].linear_inv.mul(&after);
            after = lambda_in[jr];
        }

        tapes.aux_pos = 0;
        tapes.aux_bits.fill(0);
        for jr in 1..=r {
            let input = lambda_in[jr];
            let output = lambda_out[jr];
            let helper_base = 2 * n * (jr - 1) + n;
            for s in 0..P::LOWMC_M {
                let i = 3 * s;
                let a = word_get_bit(&input, i);
                let b = word_get_bit(&input, i + 1);
                let c = word_get_bit(&input, i + 2);
                let d = word_get_bit(&output, i);
                let e = word_get_bit(&output, i + 1);
                let f = word_get_bit(&output, i + 2);

                let mask_ab = f ^ a ^ b ^ c;
                let mask_bc = d ^ a;
                let mask_ca = e ^ a ^ b;

                aux_and(tapes, last, helper_base + i, a & b, mask_ab);
                aux_and(tapes, last, helper_base + i + 1, b & c, mask_bc);
                aux_and(tapes, last, helper_base + i + 2, c & a, mask_ca);
            }
        }

        if let Some(out) = input_masks {
            words_to_bytes(&lambda_key, out);
        }

        // The online evaluation consumes the same mask stream from the top.
        tapes.pos = 0;
    }

    fn simulate_online(
        &self,
        masked_key: &[u8],
        tapes: &mut RandomTapes,
        msgs: &mut Msgs,
        plaintext: &[u8],
        pub_key: &[u8],
    ) -> Result<()> {
        let n = P::LOWMC_N;
        let num_parties = tapes.num_parties();

        let mut mkey = words_from_bytes(masked_key);
        mask_padding::<P>(&mut mkey);
        let mut state = words_from_bytes(plaintext);
        mask_padding::<P>(&mut state);
        state = word_xor(&state, &mkey);

        for round in &self.rounds {
            let mask_shares = tapes.read_share_words(n);
            for s in 0..P::LOWMC_M {
                let i = 3 * s;
                let a = word_get_bit(&state, i);
                let b = word_get_bit(&state, i + 1);
                let c = word_get_bit(&state, i + 2);
                let la = mask_shares[i];
                let lb = mask_shares[i + 1];
                let lc = mask_shares[i + 2];

                let ab = mpc_and(a, b, la, lb, tapes, msgs, num_parties);
                let bc = mpc_and(b, c, lb, lc, tapes, msgs, num_parties);
                let ca = mpc_and(c, a, lc, la, tapes, msgs, num_parties);

                word_set_bit(&mut state, i, a ^ bc);
                word_set_bit(&mut state, i + 1, a ^ b ^ ca);
                word_set_bit(&mut state, i + 2, a ^ b ^ c ^ ab);
            }
            state = round.linear.mul(&state);
            state = word_xor(&state, &round.constant);
            state = word_xor(&state, &round.key.mul(&mkey));
        }

        // The output wire mask is zero, so the masked state is the output.
        let mut output = vec![0u8; P::INPUT_OUTPUT_SIZE];
        words_to_bytes(&state, &mut output);
        if output.ct_eq(pub_key).into() {
            Ok(())
        } else {
            Err(Error::MpcInconsistent)
        }
    }

    fn encrypt(&self, key: &[u8], plaintext: &[u8], output: &mut [u8]) {
        let mut key_words = words_from_bytes(key);
        mask_padding::<P>(&mut key_words);
        let mut state = words_from_bytes(plaintext);
        mask_padding::<P>(&mut state);
        state = word_xor(&state, &key_words);

        for round in &self.rounds {
            sbox_layer(&mut state, P::LOWMC_M);
            state = round.linear.mul(&state);
            state = word_xor(&state, &round.constant);
            state = word_xor(&state, &round.key.mul(&key_words));
        }
        words_to_bytes(&state, output);
    }
}
