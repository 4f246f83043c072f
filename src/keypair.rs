// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picnic3 keypair generation.

use crate::bits::set_bit;
use crate::error::Result;
use crate::lowmc::{Lowmc, LowmcCircuit};
use crate::params::PicnicParameter;
use crate::signing_key::SigningKey;
use crate::verifying_key::VerifyingKey;
use rand::CryptoRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A Picnic3 keypair containing both signing and verifying keys.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = ""))]
pub struct KeyPair<P: PicnicParameter> {
    signing_key: SigningKey<P>,
    verifying_key: VerifyingKey<P>,
}

impl<P: PicnicParameter> AsRef<VerifyingKey<P>> for KeyPair<P> {
    fn as_ref(&self) -> &VerifyingKey<P> {
        &self.verifying_key
    }
}

impl<P: PicnicParameter> signature::KeypairRef for KeyPair<P> {
    type VerifyingKey = VerifyingKey<P>;
}

impl<P: PicnicParameter> core::fmt::Debug for KeyPair<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyPair")
            .field("variant", &P::NAME)
            .field("signing_key", &self.signing_key)
            .field("verifying_key", &self.verifying_key)
            .finish()
    }
}

impl<P: PicnicParameter> PartialEq for KeyPair<P> {
    fn eq(&self, other: &Self) -> bool {
        self.signing_key == other.signing_key && self.verifying_key == other.verifying_key
    }
}

impl<P: PicnicParameter> Eq for KeyPair<P> {}

impl<P: PicnicParameter> Zeroize for KeyPair<P> {
    fn zeroize(&mut self) {
        self.signing_key.zeroize();
    }
}

impl<P: PicnicParameter> ZeroizeOnDrop for KeyPair<P> {}

/// Sample an n-bit LowMC block with zeroed padding bits.
fn random_block<P: PicnicParameter>(rng: &mut impl CryptoRng) -> Vec<u8> {
    let mut block = vec![0u8; P::INPUT_OUTPUT_SIZE];
    rng.fill_bytes(&mut block);
    for i in P::LOWMC_N..P::INPUT_OUTPUT_SIZE * 8 {
        set_bit(&mut block, i, 0);
    }
    block
}

impl<P: PicnicParameter> KeyPair<P> {
    /// Generate a new random keypair.
    pub fn generate(rng: &mut impl CryptoRng) -> Result<Self> {
        let lowmc = Lowmc::<P>::expand();
        let secret_key = random_block::<P>(rng);
        let plaintext = random_block::<P>(rng);
        let mut ciphertext = vec![0u8; P::INPUT_OUTPUT_SIZE];
        lowmc.encrypt(&secret_key, &plaintext, &mut ciphertext);

        let mut sk_bytes = Vec::with_capacity(P::PRIVATE_KEY_SIZE);
        sk_bytes.extend_from_slice(&secret_key);
        sk_bytes.extend_from_slice(&ciphertext);
        sk_bytes.extend_from_slice(&plaintext);

        let mut vk_bytes = Vec::with_capacity(P::PUBLIC_KEY_SIZE);
        vk_bytes.extend_from_slice(&ciphertext);
        vk_bytes.extend_from_slice(&plaintext);

        Ok(Self {
            signing_key: SigningKey::try_from(sk_bytes)?,
            verifying_key: VerifyingKey::try_from(vk_bytes)?,
        })
    }

    /// Construct a keypair from a [`SigningKey`], deriving the
    /// corresponding [`VerifyingKey`].
    pub fn from_signing_key(signing_key: SigningKey<P>) -> Result<Self> {
        let verifying_key = VerifyingKey::from(&signing_key);
        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// Get a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey<P> {
        &self.signing_key
    }

    /// Get a reference to the verifying key.
    pub fn verifying_key(&self) -> &VerifyingKey<P> {
        &self.verifying_key
    }
}
