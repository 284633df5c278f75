//! Burn: move `amount` out of a confidential balance into a public one.

use log::debug;
use zether_primitives::{
    epoch_tag, Account, BurnBundle, BurnProof, BurnWitness, Error, Params, ProverRequest,
    SecretKey,
};

use crate::ClientError;

pub struct BurnInput<'a> {
    pub account: Account,
    pub secret: &'a SecretKey,
    /// Public amount leaving the confidential ledger.
    pub amount: u64,
    /// Balance left after the burn. Private.
    pub remainder: u64,
    pub epoch: u64,
}

/// Same epoch-tag and remainder machinery as a transfer, against one account
/// and with the amount disclosed. No randomizer is involved: the ledger
/// debits `amount·G` from `CL` directly.
///
/// # Errors
/// * `InvalidInput` - `secret` does not match the account
/// * `ValueOutOfRange` - `amount` or `remainder` above `max_balance`
pub fn prepare_burn(
    params: &Params,
    input: &BurnInput<'_>,
) -> Result<(BurnBundle, ProverRequest), ClientError> {
    if input.secret.public_key() != input.account.public_key {
        return Err(Error::InvalidInput("secret key does not match account").into());
    }
    params.check_amount(input.amount)?;
    params.check_amount(input.remainder)?;

    let bundle = BurnBundle::new(
        input.epoch,
        input.account,
        input.amount,
        epoch_tag(params.domain_bytes(), input.epoch, input.secret),
    );
    debug!("prepared burn bundle: epoch {}", input.epoch);

    let request = ProverRequest::burn(
        bundle.clone(),
        BurnWitness {
            remainder: input.remainder,
            secret: input.secret.clone(),
        },
    );
    Ok((bundle, request))
}

pub fn finalize_burn(bundle: BurnBundle, proof: Vec<u8>) -> BurnProof {
    BurnProof::new(bundle, proof)
}
