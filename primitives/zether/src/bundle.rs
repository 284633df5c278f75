//! Public statements handed to the prover and the ledger, and the private
//! witnesses that travel only to the prover.
//!
//! A transfer statement over an anonymity set `[(Y_0, C_0), ..]` carries
//! ```text
//! L_i = r·Y_i  (- b·G if i = sender) (+ b·G if i = receiver)
//! R   = r·G
//! u   = H(domain, epoch)·x
//! ```
//! A ledger that accepts the proof applies `CL_i += L_i`, `CR_i += R` to
//! every account in the set.

use core::fmt;
use std::collections::BTreeSet;

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use merlin::Transcript;

use crate::{
    curve::point_to_bytes, keys::PublicKey, labels, Ciphertext, Error, SecretKey, WIRE_VERSION,
};

/// One ledger account as seen by a transfer: its key and stored ciphertext.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    pub public_key: PublicKey,
    pub balance: Ciphertext,
}

impl Account {
    pub fn new(public_key: PublicKey, balance: Ciphertext) -> Self {
        Self {
            public_key,
            balance,
        }
    }
}

/// Ordered accounts participating in one transfer. Positions are addressed
/// by index; order carries no other meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnonymitySet(Vec<Account>);

impl AnonymitySet {
    pub const MIN_SIZE: usize = 2;

    /// Requires at least two accounts and pairwise distinct public keys.
    pub fn new(accounts: Vec<Account>) -> Result<Self, Error> {
        if accounts.len() < Self::MIN_SIZE {
            return Err(Error::InvalidInput("anonymity set needs at least two accounts"));
        }
        if accounts.len() > u32::MAX as usize {
            return Err(Error::InvalidInput("anonymity set too large"));
        }
        let mut seen = BTreeSet::new();
        for account in &accounts {
            if !seen.insert(account.public_key.to_bytes()) {
                return Err(Error::InvalidInput("duplicate public key in anonymity set"));
            }
        }
        Ok(Self(accounts))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Result<&Account, Error> {
        self.0.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.0.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.0.iter()
    }
}

/// Public side of a transfer. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentBundle {
    epoch: u64,
    anonymity_set: AnonymitySet,
    commitments: Vec<RistrettoPoint>,
    randomizer: RistrettoPoint,
    epoch_tag: RistrettoPoint,
    sender_index: u32,
    receiver_index: u32,
}

impl CommitmentBundle {
    /// Checks that there is one commitment per account and that the indices
    /// are valid and distinct.
    pub fn new(
        epoch: u64,
        anonymity_set: AnonymitySet,
        commitments: Vec<RistrettoPoint>,
        randomizer: RistrettoPoint,
        epoch_tag: RistrettoPoint,
        sender_index: u32,
        receiver_index: u32,
    ) -> Result<Self, Error> {
        if commitments.len() != anonymity_set.len() {
            return Err(Error::InvalidInput("one commitment per account required"));
        }
        check_indices(anonymity_set.len(), sender_index as usize, receiver_index as usize)?;
        Ok(Self {
            epoch,
            anonymity_set,
            commitments,
            randomizer,
            epoch_tag,
            sender_index,
            receiver_index,
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn anonymity_set(&self) -> &AnonymitySet {
        &self.anonymity_set
    }

    /// The per-account `L_i`.
    pub fn commitments(&self) -> &[RistrettoPoint] {
        &self.commitments
    }

    /// `R = r·G`.
    pub fn randomizer(&self) -> &RistrettoPoint {
        &self.randomizer
    }

    /// `u = H(domain, epoch)·x`.
    pub fn epoch_tag(&self) -> &RistrettoPoint {
        &self.epoch_tag
    }

    pub fn sender_index(&self) -> usize {
        self.sender_index as usize
    }

    pub fn receiver_index(&self) -> usize {
        self.receiver_index as usize
    }

    /// Fold the bundle into the ledger's stored ciphertexts, one per account
    /// and in anonymity-set order.
    pub fn apply(&self, balances: &mut [Ciphertext]) -> Result<(), Error> {
        if balances.len() != self.commitments.len() {
            return Err(Error::InvalidInput("balance count does not match anonymity set"));
        }
        for (balance, l) in balances.iter_mut().zip(&self.commitments) {
            balance.CL += l;
            balance.CR += self.randomizer;
        }
        Ok(())
    }

    /// Transcript digest over every public field. The prover binds its proof
    /// to it; the ledger recomputes it from the bundle it received.
    pub fn statement_digest(&self) -> [u8; 32] {
        let mut t = new_transcript(labels::TRANSFER, self.epoch);
        t.append_u64(b"n", self.anonymity_set.len() as u64);
        for account in self.anonymity_set.iter() {
            append_account(&mut t, account);
        }
        for l in &self.commitments {
            append_point(&mut t, b"L", l);
        }
        append_point(&mut t, b"R", &self.randomizer);
        append_point(&mut t, b"u", &self.epoch_tag);
        t.append_u64(b"sender_index", self.sender_index as u64);
        t.append_u64(b"receiver_index", self.receiver_index as u64);
        challenge_32(&mut t)
    }
}

/// Public side of a burn: a single account, the public amount leaving the
/// confidential ledger, and the epoch tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnBundle {
    epoch: u64,
    account: Account,
    amount: u64,
    epoch_tag: RistrettoPoint,
}

impl BurnBundle {
    pub fn new(epoch: u64, account: Account, amount: u64, epoch_tag: RistrettoPoint) -> Self {
        Self {
            epoch,
            account,
            amount,
            epoch_tag,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Public amount leaving the confidential ledger.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn epoch_tag(&self) -> &RistrettoPoint {
        &self.epoch_tag
    }

    /// Ledger fold: `CL -= amount·G`.
    pub fn apply(&self, balance: &mut Ciphertext) {
        *balance = balance.sub_amount(self.amount);
    }

    pub fn statement_digest(&self) -> [u8; 32] {
        let mut t = new_transcript(labels::BURN, self.epoch);
        append_account(&mut t, &self.account);
        t.append_u64(b"amount", self.amount);
        append_point(&mut t, b"u", &self.epoch_tag);
        challenge_32(&mut t)
    }
}

/// Private transfer inputs. Sent only to the trusted prover.
#[derive(Clone, PartialEq, Eq)]
pub struct TransferWitness {
    pub amount: u64,
    /// Sender balance after the transfer.
    pub remainder: u64,
    /// The randomizer `r` behind `R` and every `L_i`.
    pub randomness: Scalar,
    pub secret: SecretKey,
}

impl fmt::Debug for TransferWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferWitness").finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct BurnWitness {
    pub remainder: u64,
    pub secret: SecretKey,
}

impl fmt::Debug for BurnWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BurnWitness").finish_non_exhaustive()
    }
}

/// Everything the prover needs: the public statement, its digest, and the
/// witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProverRequest {
    Transfer {
        bundle: CommitmentBundle,
        digest: [u8; 32],
        witness: TransferWitness,
    },
    Burn {
        bundle: BurnBundle,
        digest: [u8; 32],
        witness: BurnWitness,
    },
}

impl ProverRequest {
    pub fn transfer(bundle: CommitmentBundle, witness: TransferWitness) -> Self {
        let digest = bundle.statement_digest();
        Self::Transfer {
            bundle,
            digest,
            witness,
        }
    }

    pub fn burn(bundle: BurnBundle, witness: BurnWitness) -> Self {
        let digest = bundle.statement_digest();
        Self::Burn {
            bundle,
            digest,
            witness,
        }
    }

    pub fn digest(&self) -> &[u8; 32] {
        match self {
            Self::Transfer { digest, .. } | Self::Burn { digest, .. } => digest,
        }
    }

    pub fn epoch(&self) -> u64 {
        match self {
            Self::Transfer { bundle, .. } => bundle.epoch(),
            Self::Burn { bundle, .. } => bundle.epoch(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Burn { .. } => "burn",
        }
    }
}

/// A public bundle with the prover's opaque proof attached, ready for ledger
/// submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofResult<B> {
    pub bundle: B,
    pub proof: Vec<u8>,
}

pub type TransferProof = ProofResult<CommitmentBundle>;
pub type BurnProof = ProofResult<BurnBundle>;

impl<B> ProofResult<B> {
    pub fn new(bundle: B, proof: Vec<u8>) -> Self {
        Self { bundle, proof }
    }

    pub fn into_parts(self) -> (B, Vec<u8>) {
        (self.bundle, self.proof)
    }
}

pub(crate) fn check_indices(len: usize, sender: usize, receiver: usize) -> Result<(), Error> {
    for index in [sender, receiver] {
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
    }
    if sender == receiver {
        return Err(Error::InvalidInput("sender and receiver must differ"));
    }
    Ok(())
}

fn new_transcript(kind: &'static [u8], epoch: u64) -> Transcript {
    let mut t = Transcript::new(labels::PROTOCOL);
    t.append_message(b"proto", labels::PROTOCOL_V);
    t.append_message(b"kind", kind);
    t.append_u64(b"wire_version", WIRE_VERSION as u64);
    t.append_u64(b"epoch", epoch);
    t
}

fn append_point(t: &mut Transcript, label: &'static [u8], p: &RistrettoPoint) {
    t.append_message(label, &point_to_bytes(p));
}

fn append_account(t: &mut Transcript, account: &Account) {
    t.append_message(b"y", &account.public_key.to_bytes());
    t.append_message(b"C", &account.balance.to_bytes());
}

fn challenge_32(t: &mut Transcript) -> [u8; 32] {
    let mut out = [0u8; 32];
    t.challenge_bytes(b"statement", &mut out);
    out
}
