//! Versioned SCALE encoding of bundles, prover requests and proof results.
//!
//! Every top-level payload starts with a one-byte version. Points travel as
//! 32-byte compressed encodings, ciphertexts as `CL || CR`, scalars as
//! canonical little-endian bytes. Decoding re-validates everything.

use parity_scale_codec::{Decode, DecodeAll, Encode};

use crate::{
    bundle::{
        Account, AnonymitySet, BurnBundle, BurnWitness, CommitmentBundle, ProofResult,
        ProverRequest, TransferWitness,
    },
    curve::{point_from_bytes, point_to_bytes, scalar_from_bytes, scalar_to_bytes},
    Ciphertext, Error, PublicKey, SecretKey,
};

/// Current wire version.
pub const WIRE_VERSION: u8 = 1;

/// Stable byte encoding for anything that crosses the prover or ledger
/// boundary.
pub trait WireFormat: Sized {
    fn to_wire(&self) -> Vec<u8>;
    fn from_wire(bytes: &[u8]) -> Result<Self, Error>;
}

#[derive(Encode, Decode)]
struct WireAccount {
    public_key: [u8; 32],
    balance: [u8; 64],
}

#[derive(Encode, Decode)]
struct WireCommitmentBundle {
    version: u8,
    epoch: u64,
    accounts: Vec<WireAccount>,
    commitments: Vec<[u8; 32]>,
    randomizer: [u8; 32],
    epoch_tag: [u8; 32],
    sender_index: u32,
    receiver_index: u32,
}

#[derive(Encode, Decode)]
struct WireBurnBundle {
    version: u8,
    epoch: u64,
    account: WireAccount,
    amount: u64,
    epoch_tag: [u8; 32],
}

#[derive(Encode, Decode)]
struct WireTransferWitness {
    amount: u64,
    remainder: u64,
    randomness: [u8; 32],
    secret: [u8; 32],
}

#[derive(Encode, Decode)]
struct WireBurnWitness {
    remainder: u64,
    secret: [u8; 32],
}

#[derive(Encode, Decode)]
enum WireRequestBody {
    #[codec(index = 0)]
    Transfer {
        bundle: WireCommitmentBundle,
        digest: [u8; 32],
        witness: WireTransferWitness,
    },
    #[codec(index = 1)]
    Burn {
        bundle: WireBurnBundle,
        digest: [u8; 32],
        witness: WireBurnWitness,
    },
}

#[derive(Encode, Decode)]
struct WireRequest {
    version: u8,
    body: WireRequestBody,
}

#[derive(Encode, Decode)]
struct WireProofResult {
    version: u8,
    bundle: Vec<u8>,
    proof: Vec<u8>,
}

fn check_version(bytes: &[u8]) -> Result<(), Error> {
    match bytes.first() {
        None => Err(Error::InvalidEncoding("empty payload")),
        Some(&WIRE_VERSION) => Ok(()),
        Some(&v) => Err(Error::UnsupportedVersion(v)),
    }
}

fn decode_all<T: Decode>(bytes: &[u8]) -> Result<T, Error> {
    T::decode_all(&mut &bytes[..]).map_err(|_| Error::InvalidEncoding("malformed SCALE payload"))
}

impl From<&Account> for WireAccount {
    fn from(account: &Account) -> Self {
        Self {
            public_key: account.public_key.to_bytes(),
            balance: account.balance.to_bytes(),
        }
    }
}

impl TryFrom<WireAccount> for Account {
    type Error = Error;
    fn try_from(w: WireAccount) -> Result<Self, Error> {
        Ok(Account::new(
            PublicKey::from_bytes(&w.public_key)?,
            Ciphertext::from_bytes(&w.balance)?,
        ))
    }
}

impl From<&CommitmentBundle> for WireCommitmentBundle {
    fn from(b: &CommitmentBundle) -> Self {
        Self {
            version: WIRE_VERSION,
            epoch: b.epoch(),
            accounts: b.anonymity_set().iter().map(WireAccount::from).collect(),
            commitments: b.commitments().iter().map(point_to_bytes).collect(),
            randomizer: point_to_bytes(b.randomizer()),
            epoch_tag: point_to_bytes(b.epoch_tag()),
            sender_index: b.sender_index() as u32,
            receiver_index: b.receiver_index() as u32,
        }
    }
}

impl TryFrom<WireCommitmentBundle> for CommitmentBundle {
    type Error = Error;
    fn try_from(w: WireCommitmentBundle) -> Result<Self, Error> {
        if w.version != WIRE_VERSION {
            return Err(Error::UnsupportedVersion(w.version));
        }
        let accounts = w
            .accounts
            .into_iter()
            .map(Account::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let commitments = w
            .commitments
            .iter()
            .map(|l| point_from_bytes(l))
            .collect::<Result<Vec<_>, _>>()?;
        CommitmentBundle::new(
            w.epoch,
            AnonymitySet::new(accounts)?,
            commitments,
            point_from_bytes(&w.randomizer)?,
            point_from_bytes(&w.epoch_tag)?,
            w.sender_index,
            w.receiver_index,
        )
    }
}

impl From<&BurnBundle> for WireBurnBundle {
    fn from(b: &BurnBundle) -> Self {
        Self {
            version: WIRE_VERSION,
            epoch: b.epoch(),
            account: WireAccount::from(b.account()),
            amount: b.amount(),
            epoch_tag: point_to_bytes(b.epoch_tag()),
        }
    }
}

impl TryFrom<WireBurnBundle> for BurnBundle {
    type Error = Error;
    fn try_from(w: WireBurnBundle) -> Result<Self, Error> {
        if w.version != WIRE_VERSION {
            return Err(Error::UnsupportedVersion(w.version));
        }
        Ok(BurnBundle::new(
            w.epoch,
            Account::try_from(w.account)?,
            w.amount,
            point_from_bytes(&w.epoch_tag)?,
        ))
    }
}

impl From<&TransferWitness> for WireTransferWitness {
    fn from(w: &TransferWitness) -> Self {
        Self {
            amount: w.amount,
            remainder: w.remainder,
            randomness: scalar_to_bytes(&w.randomness),
            secret: w.secret.to_bytes(),
        }
    }
}

impl TryFrom<WireTransferWitness> for TransferWitness {
    type Error = Error;
    fn try_from(w: WireTransferWitness) -> Result<Self, Error> {
        Ok(TransferWitness {
            amount: w.amount,
            remainder: w.remainder,
            randomness: scalar_from_bytes(&w.randomness)?,
            secret: SecretKey::from_bytes(&w.secret)?,
        })
    }
}

impl From<&BurnWitness> for WireBurnWitness {
    fn from(w: &BurnWitness) -> Self {
        Self {
            remainder: w.remainder,
            secret: w.secret.to_bytes(),
        }
    }
}

impl TryFrom<WireBurnWitness> for BurnWitness {
    type Error = Error;
    fn try_from(w: WireBurnWitness) -> Result<Self, Error> {
        Ok(BurnWitness {
            remainder: w.remainder,
            secret: SecretKey::from_bytes(&w.secret)?,
        })
    }
}

impl WireFormat for CommitmentBundle {
    fn to_wire(&self) -> Vec<u8> {
        WireCommitmentBundle::from(self).encode()
    }

    fn from_wire(bytes: &[u8]) -> Result<Self, Error> {
        check_version(bytes)?;
        decode_all::<WireCommitmentBundle>(bytes)?.try_into()
    }
}

impl WireFormat for BurnBundle {
    fn to_wire(&self) -> Vec<u8> {
        WireBurnBundle::from(self).encode()
    }

    fn from_wire(bytes: &[u8]) -> Result<Self, Error> {
        check_version(bytes)?;
        decode_all::<WireBurnBundle>(bytes)?.try_into()
    }
}

impl WireFormat for ProverRequest {
    fn to_wire(&self) -> Vec<u8> {
        let body = match self {
            ProverRequest::Transfer {
                bundle,
                digest,
                witness,
            } => WireRequestBody::Transfer {
                bundle: bundle.into(),
                digest: *digest,
                witness: witness.into(),
            },
            ProverRequest::Burn {
                bundle,
                digest,
                witness,
            } => WireRequestBody::Burn {
                bundle: bundle.into(),
                digest: *digest,
                witness: witness.into(),
            },
        };
        WireRequest {
            version: WIRE_VERSION,
            body,
        }
        .encode()
    }

    /// The carried digest must match the one recomputed from the decoded
    /// bundle.
    fn from_wire(bytes: &[u8]) -> Result<Self, Error> {
        check_version(bytes)?;
        let request = match decode_all::<WireRequest>(bytes)?.body {
            WireRequestBody::Transfer {
                bundle,
                digest,
                witness,
            } => ProverRequest::Transfer {
                bundle: bundle.try_into()?,
                digest,
                witness: witness.try_into()?,
            },
            WireRequestBody::Burn {
                bundle,
                digest,
                witness,
            } => ProverRequest::Burn {
                bundle: bundle.try_into()?,
                digest,
                witness: witness.try_into()?,
            },
        };
        let expected = match &request {
            ProverRequest::Transfer { bundle, .. } => bundle.statement_digest(),
            ProverRequest::Burn { bundle, .. } => bundle.statement_digest(),
        };
        if &expected != request.digest() {
            return Err(Error::InvalidEncoding("statement digest mismatch"));
        }
        Ok(request)
    }
}

impl<B: WireFormat> WireFormat for ProofResult<B> {
    fn to_wire(&self) -> Vec<u8> {
        WireProofResult {
            version: WIRE_VERSION,
            bundle: self.bundle.to_wire(),
            proof: self.proof.clone(),
        }
        .encode()
    }

    fn from_wire(bytes: &[u8]) -> Result<Self, Error> {
        check_version(bytes)?;
        let w = decode_all::<WireProofResult>(bytes)?;
        Ok(ProofResult::new(B::from_wire(&w.bundle)?, w.proof))
    }
}
