// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picnic3 parameter sets.
//!
//! Defines the [`PicnicParameter`] trait and concrete parameter sets
//! [`Picnic3L1`], [`Picnic3L3`], and [`Picnic3L5`].

/// Salt length in bytes, shared by all parameter sets.
pub const SALT_SIZE: usize = 32;

/// Largest digest size across all parameter sets.
pub const MAX_DIGEST_SIZE: usize = 64;

/// Domain-separation prefix for seed derivation and challenge iteration.
pub(crate) const HASH_PREFIX_1: u8 = 1;

/// Domain-separation prefix for Merkle node hashing.
pub(crate) const HASH_PREFIX_3: u8 = 3;

/// Trait defining all constants for a Picnic3 parameter set.
pub trait PicnicParameter: Clone + Copy + Send + Sync + 'static {
    /// Human-readable name of this parameter set.
    const NAME: &'static str;
    /// Number of simulated MPC parties per round (multiple of 4).
    const NUM_PARTIES: usize;
    /// Total number of parallel repetitions (T).
    const NUM_ROUNDS: usize;
    /// Number of repetitions opened by the challenge (tau).
    const NUM_OPENED_ROUNDS: usize;
    /// LowMC block and key size in bits.
    const LOWMC_N: usize;
    /// Number of LowMC rounds.
    const LOWMC_R: usize;
    /// Number of S-boxes per LowMC round (full layer, n = 3m).
    const LOWMC_M: usize;
    /// Byte length of a seed.
    const SEED_SIZE: usize;
    /// Byte length of a commitment digest.
    const DIGEST_SIZE: usize;
    /// Byte length of a LowMC block (key, plaintext, ciphertext).
    const INPUT_OUTPUT_SIZE: usize;
    /// Byte length of one party's view (aux bits or broadcast log).
    const VIEW_SIZE: usize;
    /// Byte length of one party's random tape.
    const TAPE_SIZE: usize;
    /// Number of AND gates in the circuit (3*r*m).
    const AND_BITS: usize;
    /// Byte length of a serialized signing key (sk || C || p).
    const PRIVATE_KEY_SIZE: usize;
    /// Byte length of a serialized verifying key (C || p).
    const PUBLIC_KEY_SIZE: usize;
}

macro_rules! define_picnic_parameter {
    (
        $name:ident, $display:expr,
        parties = $parties:expr, rounds = $rounds:expr, opened = $opened:expr,
        lowmc_n = $n:expr, lowmc_r = $r:expr, lowmc_m = $m:expr,
        seed_size = $seed:expr, digest_size = $digest:expr,
        input_output_size = $io:expr, view_size = $view:expr
    ) => {
        #[doc = concat!("Picnic3 parameter set ", $display, ".")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl PicnicParameter for $name {
            const NAME: &'static str = $display;
            const NUM_PARTIES: usize = $parties;
            const NUM_ROUNDS: usize = $rounds;
            const NUM_OPENED_ROUNDS: usize = $opened;
            const LOWMC_N: usize = $n;
            const LOWMC_R: usize = $r;
            const LOWMC_M: usize = $m;
            const SEED_SIZE: usize = $seed;
            const DIGEST_SIZE: usize = $digest;
            const INPUT_OUTPUT_SIZE: usize = $io;
            const VIEW_SIZE: usize = $view;
            const TAPE_SIZE: usize = 2 * $view;
            const AND_BITS: usize = 3 * $r * $m;
            const PRIVATE_KEY_SIZE: usize = 3 * $io;
            const PUBLIC_KEY_SIZE: usize = 2 * $io;
        }
    };
}

define_picnic_parameter!(
    Picnic3L1, "Picnic3-L1",
    parties = 16, rounds = 250, opened = 36,
    lowmc_n = 129, lowmc_r = 4, lowmc_m = 43,
    seed_size = 16, digest_size = 32,
    input_output_size = 17, view_size = 65
);

define_picnic_parameter!(
    Picnic3L3, "Picnic3-L3",
    parties = 16, rounds = 419, opened = 52,
    lowmc_n = 192, lowmc_r = 4, lowmc_m = 64,
    seed_size = 24, digest_size = 48,
    input_output_size = 24, view_size = 96
);

define_picnic_parameter!(
    Picnic3L5, "Picnic3-L5",
    parties = 16, rounds = 438, opened = 68,
    lowmc_n = 255, lowmc_r = 4, lowmc_m = 85,
    seed_size = 32, digest_size = 64,
    input_output_size = 32, view_size = 128
);

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants<P: PicnicParameter>() {
        assert_eq!(P::NUM_PARTIES % 4, 0);
        assert!(P::NUM_OPENED_ROUNDS < P::NUM_ROUNDS);
        assert_eq!(P::LOWMC_N, 3 * P::LOWMC_M);
        assert!(P::VIEW_SIZE * 8 >= P::AND_BITS);
        assert!(P::TAPE_SIZE * 8 >= 2 * P::LOWMC_N * P::LOWMC_R);
        assert!(P::DIGEST_SIZE <= MAX_DIGEST_SIZE);
        assert_eq!(P::INPUT_OUTPUT_SIZE, P::LOWMC_N.div_ceil(8));
    }

    #[test]
    fn l1_invariants() {
        check_invariants::<Picnic3L1>();
    }

    #[test]
    fn l3_invariants() {
        check_invariants::<Picnic3L3>();
    }

    #[test]
    fn l5_invariants() {
        check_invariants::<Picnic3L5>();
    }
}
