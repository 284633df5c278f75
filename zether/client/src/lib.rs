//! # zether-client: confidential balance client
//!
//! Client-side half of a Zether-style confidential balance layer. Balances
//! live on the ledger as ElGamal ciphertexts (see `zether-primitives`); this
//! crate reads them back and prepares the statements an external prover turns
//! into zero-knowledge proofs.
//!
//! ## Operations
//!
//! - [`BalanceOracle::recover`] / [`LookupTable::recover`] - bounded
//!   discrete-log recovery of a plaintext balance
//! - [`prepare_transfer`] / [`finalize_transfer`] - anonymity-set transfer
//!   commitments `L_i`, randomizer `R`, epoch tag `u`
//! - [`prepare_burn`] / [`finalize_burn`] - single-account withdrawal to a
//!   public balance
//! - [`ZetherClient`] - the above wired to a [`ProverService`] and an
//!   [`EpochSource`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zether_client::{ClientConfig, FixedEpoch, FnProver, ZetherClient};
//!
//! let prover = FnProver(|req: &ProverRequest| my_prover.prove(req));
//! let client = ZetherClient::new(ClientConfig::default(), prover, FixedEpoch(7))?;
//!
//! let alice = client.create_account(&mut rand::rng());
//! let proof = client.transfer(&set, 0, 1, &alice, 10, 90, &mut rand::rng())?;
//! // submit proof.to_wire() to the ledger
//! ```
//!
//! ## Security Notes
//!
//! - The randomizer is drawn fresh per call and never reused
//! - Secret keys and randomizers only ever leave through [`ProverService`]
//! - No operation is retried after the prover has seen a request

pub mod bench_vectors;
mod burn;
mod client;
mod config;
mod oracle;
mod services;
mod transfer;


use thiserror::Error;

pub use burn::{finalize_burn, prepare_burn, BurnInput};
pub use client::ZetherClient;
pub use config::{ClientConfig, MAX_TABLE_GIANT_STEP};
pub use oracle::{BalanceOracle, LookupTable};
pub use services::{ClockEpoch, EpochSource, FixedEpoch, FnProver, ProverService};
pub use transfer::{finalize_transfer, prepare_transfer, TransferInput};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Primitive(#[from] zether_primitives::Error),
    #[error("invalid search range [{start}, {end}] (max balance {max})")]
    InvalidRange { start: u64, end: u64, max: u64 },
    #[error("no balance in [{start}, {end}] matches the ciphertext")]
    DecryptionFailure { start: u64, end: u64 },
    #[error("prover unavailable: {0}")]
    ProverUnavailable(String),
    #[error("epoch unavailable: {0}")]
    EpochUnavailable(String),
    #[error("config: {0}")]
    Config(String),
    #[error("thread pool: {0}")]
    ThreadPool(String),
}
