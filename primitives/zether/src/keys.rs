//! Account keys: `Y = x·G`.

use core::fmt;

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::IsIdentity};
use rand::{CryptoRng, RngCore};

use crate::{
    curve::{
        point_from_bytes, point_to_bytes, random_nonzero_scalar, scalar_base_mul,
        scalar_from_bytes, POINT_LEN, SCALAR_LEN,
    },
    Error,
};

/// Account secret. Only the holder and the trusted prover ever see it.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Scalar);

impl SecretKey {
    /// Rejects non-canonical encodings and zero.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_scalar(scalar_from_bytes(bytes)?)
    }

    pub fn from_scalar(x: Scalar) -> Result<Self, Error> {
        if x == Scalar::ZERO {
            return Err(Error::InvalidInput("secret key must be non-zero"));
        }
        Ok(Self(x))
    }

    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        self.0.to_bytes()
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(scalar_base_mul(&self.0))
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Account public key. Never the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(RistrettoPoint);

impl PublicKey {
    pub fn from_point(y: RistrettoPoint) -> Result<Self, Error> {
        if y.is_identity() {
            return Err(Error::InvalidEncoding("identity public key"));
        }
        Ok(Self(y))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_point(point_from_bytes(bytes)?)
    }

    pub fn as_point(&self) -> &RistrettoPoint {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; POINT_LEN] {
        point_to_bytes(&self.0)
    }
}

/// `{secret, public}` with `public = secret·G`.
#[derive(Clone, Debug)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// Draw a fresh non-zero secret from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let secret = SecretKey(random_nonzero_scalar(rng));
        Self::from_secret(secret)
    }

    pub fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}
