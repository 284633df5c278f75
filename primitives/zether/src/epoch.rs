//! Epoch-bound uniqueness tags.
//!
//! `u = H(domain, epoch)·x`. The same key produces the same tag for the whole
//! epoch, so a verifier can reject a second proof from that account in the
//! epoch without learning `x`.

use curve25519_dalek::ristretto::RistrettoPoint;
use sha2::{Digest, Sha512};

use crate::keys::SecretKey;

/// Hash `(domain, epoch)` onto the group.
///
/// The epoch is laid out as a 32-byte big-endian word (24 zero bytes then
/// the `u64`), the width verifiers hash it at. The domain is length-prefixed.
pub fn epoch_generator(domain: &[u8], epoch: u64) -> RistrettoPoint {
    let hasher = Sha512::new()
        .chain_update((domain.len() as u64).to_le_bytes())
        .chain_update(domain)
        .chain_update([0u8; 24])
        .chain_update(epoch.to_be_bytes());
    RistrettoPoint::from_hash(hasher)
}

pub fn epoch_tag(domain: &[u8], epoch: u64, secret: &SecretKey) -> RistrettoPoint {
    secret.as_scalar() * epoch_generator(domain, epoch)
}
