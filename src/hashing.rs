// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental SHAKE contexts for commitments and key derivation.
//!
//! Parameter sets with a 256-bit digest use SHAKE128, the larger sets use
//! SHAKE256. [`HashCtxX4`] presents the 4-way batched interface used for
//! tape derivation and quartet commitments; its output is bit-identical
//! to four independent single-lane contexts.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake128Reader, Shake256, Shake256Reader};

enum Absorb {
    Shake128(Shake128),
    Shake256(Shake256),
}

enum Squeeze {
    Shake128(Shake128Reader),
    Shake256(Shake256Reader),
}

/// An incremental XOF in the absorbing state.
pub(crate) struct HashCtx(Absorb);

/// An XOF that has been finalized and can be squeezed.
pub(crate) struct HashReader(Squeeze);

impl HashCtx {
    /// Start a context; the digest size selects the SHAKE variant.
    pub(crate) fn new(digest_size: usize) -> Self {
        if digest_size == 32 {
            Self(Absorb::Shake128(Shake128::default()))
        } else {
            Self(Absorb::Shake256(Shake256::default()))
        }
    }

    /// Start a context whose first absorbed byte is a domain-separation prefix.
    pub(crate) fn new_prefixed(digest_size: usize, prefix: u8) -> Self {
        let mut ctx = Self::new(digest_size);
        ctx.update(&[prefix]);
        ctx
    }

    pub(crate) fn update(&mut self, bytes: &[u8]) {
        match &mut self.0 {
            Absorb::Shake128(h) => h.update(bytes),
            Absorb::Shake256(h) => h.update(bytes),
        }
    }

    pub(crate) fn update_u16_le(&mut self, value: u16) {
        self.update(&value.to_le_bytes());
    }

    pub(crate) fn finalize(self) -> HashReader {
        match self.0 {
            Absorb::Shake128(h) => HashReader(Squeeze::Shake128(h.finalize_xof())),
            Absorb::Shake256(h) => HashReader(Squeeze::Shake256(h.finalize_xof())),
        }
    }
}

impl HashReader {
    pub(crate) fn squeeze(&mut self, out: &mut [u8]) {
        match &mut self.0 {
            Squeeze::Shake128(r) => r.read(out),
            Squeeze::Shake256(r) => r.read(out),
        }
    }
}

/// Four independent XOF lanes absorbed and squeezed together.
pub(crate) struct HashCtxX4([HashCtx; 4]);

/// The squeezing state of [`HashCtxX4`].
pub(crate) struct HashReaderX4([HashReader; 4]);

impl HashCtxX4 {
    pub(crate) fn new(digest_size: usize) -> Self {
        Self(core::array::from_fn(|_| HashCtx::new(digest_size)))
    }

    /// Absorb a distinct byte string into each lane.
    pub(crate) fn update4(&mut self, parts: [&[u8]; 4]) {
        for (lane, part) in self.0.iter_mut().zip(parts) {
            lane.update(part);
        }
    }

    /// Absorb the same byte string into all four lanes.
    pub(crate) fn update1(&mut self, bytes: &[u8]) {
        for lane in &mut self.0 {
            lane.update(bytes);
        }
    }

    /// Absorb the same little-endian u16 into all four lanes.
    pub(crate) fn update_u16_le(&mut self, value: u16) {
        self.update1(&value.to_le_bytes());
    }

    /// Absorb a distinct little-endian u16 into each lane.
    pub(crate) fn update_u16s_le(&mut self, values: [u16; 4]) {
        for (lane, value) in self.0.iter_mut().zip(values) {
            lane.update_u16_le(value);
        }
    }

    pub(crate) fn finalize(self) -> HashReaderX4 {
        HashReaderX4(self.0.map(HashCtx::finalize))
    }
}

impl HashReaderX4 {
    /// Squeeze each lane into its own output buffer.
    pub(crate) fn squeeze4(&mut self, outs: [&mut [u8]; 4]) {
        for (lane, out) in self.0.iter_mut().zip(outs) {
            lane.squeeze(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_lane(digest_size: usize, distinct: &[u8], shared: &[u8], j: u16) -> Vec<u8> {
        let mut ctx = HashCtx::new(digest_size);
        ctx.update(distinct);
        ctx.update(shared);
        ctx.update_u16_le(j);
        let mut out = vec![0u8; digest_size];
        ctx.finalize().squeeze(&mut out);
        out
    }

    #[test]
    fn batched_matches_single_lanes() {
        for digest_size in [32usize, 48, 64] {
            let inputs: [&[u8]; 4] = [b"lane zero", b"lane one", b"lane two", b"lane three"];
            let shared = b"shared material";

            let mut ctx = HashCtxX4::new(digest_size);
            ctx.update4(inputs);
            ctx.update1(shared);
            ctx.update_u16s_le([0, 1, 2, 3]);
            let mut outs = [
                vec![0u8; digest_size],
                vec![0u8; digest_size],
                vec![0u8; digest_size],
                vec![0u8; digest_size],
            ];
            {
                let [o0, o1, o2, o3] = &mut outs;
                ctx.finalize().squeeze4([
                    o0.as_mut_slice(),
                    o1.as_mut_slice(),
                    o2.as_mut_slice(),
                    o3.as_mut_slice(),
                ]);
            }

            for (j, out) in outs.iter().enumerate() {
                assert_eq!(out, &single_lane(digest_size, inputs[j], shared, j as u16));
            }
        }
    }

    #[test]
    fn prefix_changes_output() {
        let mut plain = HashCtx::new(32);
        plain.update(b"data");
        let mut with_prefix = HashCtx::new_prefixed(32, 1);
        with_prefix.update(b"data");

        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        plain.finalize().squeeze(&mut a);
        with_prefix.finalize().squeeze(&mut b);
        assert_ne!(a, b);
    }
}
