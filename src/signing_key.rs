// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picnic3 signing key.

use crate::error::Error;
use crate::params::PicnicParameter;
use crate::picnic_signature::Signature;
use crate::sign::sign_picnic3;
use core::marker::PhantomData;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A Picnic3 signing key: the LowMC key followed by the public
/// ciphertext/plaintext pair (sk || C || p).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey<P: PicnicParameter> {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    _marker: PhantomData<P>,
}

impl<P: PicnicParameter> AsRef<[u8]> for SigningKey<P> {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl<P: PicnicParameter> TryFrom<&[u8]> for SigningKey<P> {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != P::PRIVATE_KEY_SIZE {
            return Err(Error::InvalidKeyLength {
                expected: P::PRIVATE_KEY_SIZE,
                got: bytes.len(),
            });
        }
        Ok(Self {
            bytes: bytes.to_vec(),
            _marker: PhantomData,
        })
    }
}

impl<P: PicnicParameter> TryFrom<Vec<u8>> for SigningKey<P> {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl<P: PicnicParameter> TryFrom<&Vec<u8>> for SigningKey<P> {
    type Error = Error;

    fn try_from(bytes: &Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl<P: PicnicParameter> TryFrom<Box<[u8]>> for SigningKey<P> {
    type Error = Error;

    fn try_from(bytes: Box<[u8]>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_ref())
    }
}

impl<P: PicnicParameter> PartialEq for SigningKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<P: PicnicParameter> Eq for SigningKey<P> {}

impl<P: PicnicParameter> core::fmt::Debug for SigningKey<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SigningKey")
            .field("variant", &P::NAME)
            .field("bytes", &"**FILTERED**")
            .finish_non_exhaustive()
    }
}

impl<P: PicnicParameter> SigningKey<P> {
    /// The secret LowMC key.
    pub(crate) fn secret_key(&self) -> &[u8] {
        &self.bytes[..P::INPUT_OUTPUT_SIZE]
    }

    /// The public ciphertext C = LowMC(sk, p).
    pub(crate) fn ciphertext(&self) -> &[u8] {
        &self.bytes[P::INPUT_OUTPUT_SIZE..2 * P::INPUT_OUTPUT_SIZE]
    }

    /// The public plaintext p.
    pub(crate) fn plaintext(&self) -> &[u8] {
        &self.bytes[2 * P::INPUT_OUTPUT_SIZE..]
    }
}

impl<P: PicnicParameter> signature::Signer<Signature<P>> for SigningKey<P> {
    fn try_sign(&self, msg: &[u8]) -> Result<Signature<P>, signature::Error> {
        let sig = sign_picnic3::<P>(self.secret_key(), self.ciphertext(), self.plaintext(), msg)
            .map_err(|_| -> signature::Error { Error::Signing.into() })?;
        Signature::try_from(sig.serialize::<P>()).map_err(|e| -> signature::Error { e.into() })
    }
}

#[cfg(feature = "serde")]
impl<P: PicnicParameter> serde::Serialize for SigningKey<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serdect::slice::serialize_hex_lower_or_bin(&self.bytes, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, P: PicnicParameter> serde::Deserialize<'de> for SigningKey<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::try_from(bytes).map_err(serde::de::Error::custom)
    }
}
