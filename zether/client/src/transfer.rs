//! Transfer coordination over an anonymity set.

use curve25519_dalek::scalar::Scalar;
use log::debug;
use rand::{CryptoRng, RngCore};
use zether_primitives::{
    curve::{random_nonzero_scalar, scalar_base_mul},
    epoch_tag, AnonymitySet, CommitmentBundle, Error, Params, ProverRequest, SecretKey,
    TransferProof, TransferWitness,
};

use crate::ClientError;

pub struct TransferInput<'a> {
    pub anonymity_set: &'a AnonymitySet,
    pub sender_index: usize,
    pub receiver_index: usize,
    /// Must belong to the account at `sender_index`.
    pub secret: &'a SecretKey,
    pub amount: u64,
    /// Sender balance after the transfer.
    pub remainder: u64,
    pub epoch: u64,
}

/// Build the public commitments and the prover request for a transfer.
///
/// A fresh randomizer `r` is drawn from `rng` on every call. For each account
/// `L_i = r·Y_i`, with `amount·G` taken from the sender and added to the
/// receiver, so a ledger applying `CL_i += L_i`, `CR_i += R` moves value
/// between exactly those two accounts.
///
/// # Errors
/// * `IndexOutOfRange` - either index is outside the set
/// * `InvalidInput` - equal indices, or `secret` does not match the sender
/// * `ValueOutOfRange` - `amount` or `remainder` above `max_balance`
pub fn prepare_transfer<R: RngCore + CryptoRng>(
    params: &Params,
    input: &TransferInput<'_>,
    rng: &mut R,
) -> Result<(CommitmentBundle, ProverRequest), ClientError> {
    let set = input.anonymity_set;
    let sender = set.get(input.sender_index)?;
    set.get(input.receiver_index)?;
    if input.sender_index == input.receiver_index {
        return Err(Error::InvalidInput("sender and receiver must differ").into());
    }
    if input.secret.public_key() != sender.public_key {
        return Err(Error::InvalidInput("secret key does not match sender").into());
    }
    params.check_amount(input.amount)?;
    params.check_amount(input.remainder)?;

    let r = random_nonzero_scalar(rng);
    let shift = scalar_base_mul(&Scalar::from(input.amount));

    let commitments = set
        .iter()
        .enumerate()
        .map(|(i, account)| {
            let l = r * account.public_key.as_point();
            if i == input.sender_index {
                l - shift
            } else if i == input.receiver_index {
                l + shift
            } else {
                l
            }
        })
        .collect();

    let bundle = CommitmentBundle::new(
        input.epoch,
        set.clone(),
        commitments,
        scalar_base_mul(&r),
        epoch_tag(params.domain_bytes(), input.epoch, input.secret),
        input.sender_index as u32,
        input.receiver_index as u32,
    )?;
    debug!(
        "prepared transfer bundle: epoch {}, {} accounts",
        input.epoch,
        set.len()
    );

    let request = ProverRequest::transfer(
        bundle.clone(),
        TransferWitness {
            amount: input.amount,
            remainder: input.remainder,
            randomness: r,
            secret: input.secret.clone(),
        },
    );
    Ok((bundle, request))
}

/// Attach the prover's proof to the public bundle. No further cryptography
/// happens here; validity is the verifier's call.
pub fn finalize_transfer(bundle: CommitmentBundle, proof: Vec<u8>) -> TransferProof {
    TransferProof::new(bundle, proof)
}
