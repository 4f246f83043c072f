// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picnic3 verifying (public) key.

use crate::error::Error;
use crate::lowmc::{Lowmc, LowmcCircuit};
use crate::params::PicnicParameter;
use crate::picnic_signature::Signature;
use crate::proof::UnpackedSignature;
use crate::signing_key::SigningKey;
use crate::verify::verify_picnic3;
use core::marker::PhantomData;

/// A Picnic3 verifying key: the public ciphertext/plaintext pair (C || p)
/// with C = LowMC(sk, p).
#[derive(Clone)]
pub struct VerifyingKey<P: PicnicParameter> {
    bytes: Vec<u8>,
    _marker: PhantomData<P>,
}

impl<P: PicnicParameter> AsRef<[u8]> for VerifyingKey<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: PicnicParameter> TryFrom<&[u8]> for VerifyingKey<P> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != P::PUBLIC_KEY_SIZE {
            return Err(Error::InvalidKeyLength {
                expected: P::PUBLIC_KEY_SIZE,
                got: bytes.len(),
            });
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            _marker: PhantomData,
        })
    }
}

impl<P: PicnicParameter> TryFrom<Vec<u8>> for VerifyingKey<P> {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl<P: PicnicParameter> TryFrom<&Vec<u8>> for VerifyingKey<P> {
    type Error = Error;

    fn try_from(bytes: &Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl<P: PicnicParameter> TryFrom<Box<[u8]>> for VerifyingKey<P> {
    type Error = Error;

    fn try_from(bytes: Box<[u8]>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_ref())
    }
}

impl<P: PicnicParameter> PartialEq for VerifyingKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<P: PicnicParameter> Eq for VerifyingKey<P> {}

impl<P: PicnicParameter> core::fmt::Debug for VerifyingKey<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VerifyingKey")
            .field("variant", &P::NAME)
            .field("bytes", &hex::encode(&self.bytes))
            .finish()
    }
}

impl<P: PicnicParameter> VerifyingKey<P> {
    /// The public ciphertext C.
    pub(crate) fn ciphertext(&self) -> &[u8] {
        &self.bytes[..P::INPUT_OUTPUT_SIZE]
    }

    /// The public plaintext p.
    pub(crate) fn plaintext(&self) -> &[u8] {
        &self.bytes[P::INPUT_OUTPUT_SIZE..]
    }
}

impl<P: PicnicParameter> From<&SigningKey<P>> for VerifyingKey<P> {
    fn from(sk: &SigningKey<P>) -> Self {
        let lowmc = Lowmc::<P>::expand();
        let mut bytes = vec![0u8; P::PUBLIC_KEY_SIZE];
        let (ciphertext, plaintext) = bytes.split_at_mut(P::INPUT_OUTPUT_SIZE);
        lowmc.encrypt(sk.secret_key(), sk.plaintext(), ciphertext);
        plaintext.copy_from_slice(sk.plaintext());
        Self {
            bytes,
            _marker: PhantomData,
        }
    }
}

impl<P: PicnicParameter> signature::Verifier<Signature<P>> for VerifyingKey<P> {
    fn verify(&self, msg: &[u8], signature: &Signature<P>) -> Result<(), signature::Error> {
        // Every failure mode collapses to the same opaque error.
        let sig = UnpackedSignature::deserialize::<P>(signature.as_ref())
            .map_err(|_| Error::VerificationFailed)?;
        verify_picnic3::<P>(&sig, self.ciphertext(), self.plaintext(), msg)
            .map_err(|_| Error::VerificationFailed)
            .map_err(Into::into)
    }
}

#[cfg(feature = "serde")]
impl<P: PicnicParameter> serde::Serialize for VerifyingKey<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, P: PicnicParameter> serde::Deserialize<'de> for VerifyingKey<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::try_from(bytes).map_err(serde::de::Error::custom)
    }
}
