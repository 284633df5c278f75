use log::{info, warn};
use rand::{CryptoRng, RngCore};
use zether_primitives::{
    Account, AnonymitySet, BurnProof, Ciphertext, KeyPair, Params, ProverRequest, SecretKey,
    TransferProof,
};

use crate::{
    burn::{finalize_burn, prepare_burn, BurnInput},
    transfer::{finalize_transfer, prepare_transfer, TransferInput},
    BalanceOracle, ClientConfig, ClientError, EpochSource, LookupTable, ProverService,
};

/// End-to-end account operations against an injected prover and epoch
/// source.
///
/// Each transfer or burn is prepared once, dispatched once, and either
/// finalized or dropped. Nothing is retried: a caller that wants another
/// attempt starts over and gets a fresh randomizer.
pub struct ZetherClient<P, E> {
    config: ClientConfig,
    oracle: BalanceOracle,
    prover: P,
    epochs: E,
}

impl<P: ProverService, E: EpochSource> ZetherClient<P, E> {
    pub fn new(config: ClientConfig, prover: P, epochs: E) -> Result<Self, ClientError> {
        let oracle = BalanceOracle::new(&config)?;
        Ok(Self {
            config,
            oracle,
            prover,
            epochs,
        })
    }

    pub fn params(&self) -> &Params {
        &self.config.params
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn create_account<R: RngCore + CryptoRng>(&self, rng: &mut R) -> KeyPair {
        KeyPair::generate(rng)
    }

    pub fn read_balance(
        &self,
        ciphertext: &Ciphertext,
        secret: &SecretKey,
        start: u64,
        end: u64,
    ) -> Result<u64, ClientError> {
        self.oracle.recover(ciphertext, secret, start, end)
    }

    pub fn read_balance_with_table(
        &self,
        table: &LookupTable,
        ciphertext: &Ciphertext,
        secret: &SecretKey,
        start: u64,
        end: u64,
    ) -> Result<u64, ClientError> {
        table.recover(ciphertext, secret, start, end)
    }

    pub fn build_lookup_table(&self) -> Result<LookupTable, ClientError> {
        LookupTable::new(&self.config.params, self.config.table_giant_step)
    }

    pub fn transfer<R: RngCore + CryptoRng>(
        &self,
        anonymity_set: &AnonymitySet,
        sender_index: usize,
        receiver_index: usize,
        sender: &KeyPair,
        amount: u64,
        remainder: u64,
        rng: &mut R,
    ) -> Result<TransferProof, ClientError> {
        let epoch = self.epochs.current_epoch()?;
        let (bundle, request) = prepare_transfer(
            &self.config.params,
            &TransferInput {
                anonymity_set,
                sender_index,
                receiver_index,
                secret: sender.secret(),
                amount,
                remainder,
                epoch,
            },
            rng,
        )?;
        let proof = self.dispatch(&request)?;
        info!("transfer proof ready for epoch {epoch}");
        Ok(finalize_transfer(bundle, proof))
    }

    pub fn burn(
        &self,
        account: Account,
        owner: &KeyPair,
        amount: u64,
        remainder: u64,
    ) -> Result<BurnProof, ClientError> {
        let epoch = self.epochs.current_epoch()?;
        let (bundle, request) = prepare_burn(
            &self.config.params,
            &BurnInput {
                account,
                secret: owner.secret(),
                amount,
                remainder,
                epoch,
            },
        )?;
        let proof = self.dispatch(&request)?;
        info!("burn proof ready for epoch {epoch}");
        Ok(finalize_burn(bundle, proof))
    }

    /// One round-trip to the prover. Any failure, including an empty proof,
    /// surfaces as `ProverUnavailable`.
    fn dispatch(&self, request: &ProverRequest) -> Result<Vec<u8>, ClientError> {
        let proof = self.prover.prove(request).map_err(|e| {
            warn!("prover failed for {} in epoch {}: {e}", request.kind(), request.epoch());
            match e {
                ClientError::ProverUnavailable(_) => e,
                other => ClientError::ProverUnavailable(other.to_string()),
            }
        })?;
        if proof.is_empty() {
            warn!("prover returned an empty proof for {}", request.kind());
            return Err(ClientError::ProverUnavailable("empty proof".into()));
        }
        Ok(proof)
    }
}
