//! Additively homomorphic ElGamal over the Ristretto group.
//!
//! A balance `b` encrypted under `Y` with randomness `r` is the pair
//! ```text
//! CR = r·G
//! CL = b·G + r·Y
//! ```
//! so `CL - x·CR = b·G` for the secret `x` with `Y = x·G`.

use core::ops::{Add, AddAssign, Sub, SubAssign};

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar, traits::Identity};

use crate::{
    curve::{amount_point, point_from_bytes, point_to_bytes, scalar_base_mul, POINT_LEN},
    Error, Params,
};

/// Width of an encoded ciphertext: `CL(32) || CR(32)`.
pub const CIPHERTEXT_LEN: usize = 2 * POINT_LEN;

#[allow(non_snake_case)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub CL: RistrettoPoint,
    pub CR: RistrettoPoint,
}

impl Ciphertext {
    /// Encrypt `value` under `public_key` with explicit randomness.
    ///
    /// Fails with `ValueOutOfRange` if `value > params.max_balance`.
    pub fn encrypt(
        params: &Params,
        value: u64,
        randomness: &Scalar,
        public_key: &RistrettoPoint,
    ) -> Result<Self, Error> {
        let value = params.check_amount(value)?;
        Ok(Self {
            CL: amount_point(value) + randomness * public_key,
            CR: scalar_base_mul(randomness),
        })
    }

    /// Encryption of zero with zero randomness: the state of an account that
    /// has never been funded.
    pub fn zero() -> Self {
        Self {
            CL: RistrettoPoint::identity(),
            CR: RistrettoPoint::identity(),
        }
    }

    /// Componentwise sum. Decrypts to the sum of the plaintexts when both
    /// operands are under the same key.
    pub fn homomorphic_add(&self, other: &Self) -> Self {
        Self {
            CL: self.CL + other.CL,
            CR: self.CR + other.CR,
        }
    }

    pub fn homomorphic_sub(&self, other: &Self) -> Self {
        Self {
            CL: self.CL - other.CL,
            CR: self.CR - other.CR,
        }
    }

    /// Fold fresh randomness `Δr` into the ciphertext without touching the
    /// plaintext.
    pub fn rerandomize(&self, delta_r: &Scalar, public_key: &RistrettoPoint) -> Self {
        Self {
            CL: self.CL + delta_r * public_key,
            CR: self.CR + scalar_base_mul(delta_r),
        }
    }

    /// Publicly credit `amount` (no new randomness).
    pub fn add_amount(&self, amount: u64) -> Self {
        Self {
            CL: self.CL + amount_point(amount),
            CR: self.CR,
        }
    }

    /// Publicly debit `amount`, as a ledger does on burn.
    pub fn sub_amount(&self, amount: u64) -> Self {
        Self {
            CL: self.CL - amount_point(amount),
            CR: self.CR,
        }
    }

    /// `CL - x·CR`, equal to `b·G` when `x` matches the encryption key.
    pub fn decrypt_point(&self, secret: &Scalar) -> RistrettoPoint {
        self.CL - secret * self.CR
    }

    pub fn to_bytes(&self) -> [u8; CIPHERTEXT_LEN] {
        let mut out = [0u8; CIPHERTEXT_LEN];
        out[..POINT_LEN].copy_from_slice(&point_to_bytes(&self.CL));
        out[POINT_LEN..].copy_from_slice(&point_to_bytes(&self.CR));
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != CIPHERTEXT_LEN {
            return Err(Error::InvalidEncoding("ciphertext must be 64 bytes"));
        }
        Ok(Self {
            CL: point_from_bytes(&bytes[..POINT_LEN])?,
            CR: point_from_bytes(&bytes[POINT_LEN..])?,
        })
    }
}

impl Default for Ciphertext {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Ciphertext {
    type Output = Ciphertext;
    fn add(self, rhs: Ciphertext) -> Ciphertext {
        self.homomorphic_add(&rhs)
    }
}

impl AddAssign for Ciphertext {
    fn add_assign(&mut self, rhs: Ciphertext) {
        *self = self.homomorphic_add(&rhs);
    }
}

impl Sub for Ciphertext {
    type Output = Ciphertext;
    fn sub(self, rhs: Ciphertext) -> Ciphertext {
        self.homomorphic_sub(&rhs)
    }
}

impl SubAssign for Ciphertext {
    fn sub_assign(&mut self, rhs: Ciphertext) {
        *self = self.homomorphic_sub(&rhs);
    }
}
