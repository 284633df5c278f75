//! # zether-primitives: shared types for Zether-style confidential balances
//!
//! Balances are stored on the ledger as ElGamal ciphertexts over the
//! Ristretto group. This crate holds everything the client, the external
//! prover and the ledger have to agree on:
//!
//! - [`curve`]: group arithmetic and canonical point/scalar encodings
//! - [`Ciphertext`]: encryption, homomorphic addition, re-randomization
//! - [`KeyPair`]: account keys `Y = x·G`
//! - [`epoch`]: the epoch tag `u = H(domain, epoch)·x` used for replay
//!   protection
//! - [`CommitmentBundle`] / [`BurnBundle`]: public statements, and the
//!   reference ledger fold
//! - [`ProverRequest`] / [`ProofResult`]: what goes to the prover and what
//!   comes back
//! - [`wire`]: the versioned SCALE encoding of all of the above
//!
//! ## Wire layouts
//!
//! **Ciphertext:**
//! ```text
//! CL(32) || CR(32)
//! ```
//!
//! **Commitment bundle (SCALE):**
//! ```text
//! version(1) || epoch(8) || [y(32) || C(64)]* || [L(32)]* || R(32) || u(32) || sender(4) || receiver(4)
//! ```
//!
//! ## Security Notes
//!
//! - Every point read from outside is decompressed and rejected if invalid
//! - Randomizers and keys use 512-bit wide reduction
//! - Secret keys and witnesses never print their contents

pub mod bundle;
pub mod curve;
pub mod elgamal;
pub mod epoch;
pub mod keys;
pub mod params;
pub mod wire;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use bundle::{
    Account, AnonymitySet, BurnBundle, BurnProof, BurnWitness, CommitmentBundle, ProofResult,
    ProverRequest, TransferProof, TransferWitness,
};
pub use elgamal::{Ciphertext, CIPHERTEXT_LEN};
pub use epoch::{epoch_generator, epoch_tag};
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use params::{Params, DEFAULT_EPOCH_DOMAIN, DEFAULT_MAX_BALANCE};
pub use wire::{WireFormat, WIRE_VERSION};

/// Transcript labels shared with the prover.
pub mod labels {
    pub const PROTOCOL: &[u8] = b"zether";
    pub const PROTOCOL_V: &[u8] = b"v1";
    pub const TRANSFER: &[u8] = b"transfer";
    pub const BURN: &[u8] = b"burn";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(&'static str),
    #[error("value {value} outside [0, {max}]")]
    ValueOutOfRange { value: u64, max: u64 },
    #[error("index {index} out of range for anonymity set of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("unsupported wire version {0}")]
    UnsupportedVersion(u8),
}
