//! Group arithmetic and canonical encodings.
//!
//! All points live in the prime-order Ristretto group. Encodings are the
//! 32-byte compressed form; anything that does not decompress is rejected.
//! The identity decodes like any other element; callers that must exclude it
//! (public keys) check explicitly.

use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use rand::{CryptoRng, RngCore};

use crate::Error;

/// Group generator `G`.
pub const G: RistrettoPoint = RISTRETTO_BASEPOINT_POINT;

/// Width of an encoded point.
pub const POINT_LEN: usize = 32;
/// Width of an encoded scalar.
pub const SCALAR_LEN: usize = 32;

pub fn point_add(p: &RistrettoPoint, q: &RistrettoPoint) -> RistrettoPoint {
    p + q
}

pub fn point_sub(p: &RistrettoPoint, q: &RistrettoPoint) -> RistrettoPoint {
    p - q
}

pub fn negate(p: &RistrettoPoint) -> RistrettoPoint {
    -p
}

/// `k·P`
pub fn scalar_mul(p: &RistrettoPoint, k: &Scalar) -> RistrettoPoint {
    k * p
}

/// `k·G`, using the precomputed basepoint table.
pub fn scalar_base_mul(k: &Scalar) -> RistrettoPoint {
    RistrettoPoint::mul_base(k)
}

/// `v·G` for a plaintext amount.
pub fn amount_point(v: u64) -> RistrettoPoint {
    scalar_base_mul(&Scalar::from(v))
}

pub fn point_to_bytes(p: &RistrettoPoint) -> [u8; POINT_LEN] {
    p.compress().to_bytes()
}

/// Decode a compressed point, rejecting wrong lengths and non-canonical
/// encodings.
pub fn point_from_bytes(bytes: &[u8]) -> Result<RistrettoPoint, Error> {
    let compressed = CompressedRistretto::from_slice(bytes)
        .map_err(|_| Error::InvalidEncoding("point must be 32 bytes"))?;
    compressed
        .decompress()
        .ok_or(Error::InvalidEncoding("not a valid ristretto point"))
}

pub fn scalar_to_bytes(k: &Scalar) -> [u8; SCALAR_LEN] {
    k.to_bytes()
}

/// Decode a canonical little-endian scalar.
pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, Error> {
    let arr: [u8; SCALAR_LEN] = bytes
        .try_into()
        .map_err(|_| Error::InvalidEncoding("scalar must be 32 bytes"))?;
    Option::from(Scalar::from_canonical_bytes(arr))
        .ok_or(Error::InvalidEncoding("non-canonical scalar"))
}

/// Uniform scalar from 64 bytes of RNG output.
///
/// `Scalar::from(rng.next_u64())` would only carry 64 bits of entropy; the
/// wide reduction uses the full output.
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    Scalar::from_bytes_mod_order_wide(&bytes)
}

/// Like [`random_scalar`] but never zero. Used for keys and randomizers,
/// where zero would expose the plaintext.
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let k = random_scalar(rng);
        if k != Scalar::ZERO {
            return k;
        }
    }
}
