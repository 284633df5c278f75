use curve25519_dalek::scalar::Scalar;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde_json::json;
use zether_primitives::{
    Account, AnonymitySet, Ciphertext, KeyPair, Params, SecretKey, WireFormat,
};

use crate::{
    burn::{prepare_burn, BurnInput},
    transfer::{prepare_transfer, TransferInput},
    ClientError,
};

/// Seed for the transfer randomizer in the generated vectors.
pub const VECTOR_SEED: [u8; 32] = [7u8; 32];

fn fixed_keypair(x: u64) -> Result<KeyPair, ClientError> {
    Ok(KeyPair::from_secret(SecretKey::from_scalar(Scalar::from(x))?))
}

/// Deterministic transfer and burn vectors for prover/ledger interop tests,
/// rendered as pretty JSON with hex-encoded wire payloads.
pub fn deterministic_vectors() -> Result<String, ClientError> {
    let params = Params::default();
    let epoch = 42u64;

    // ---- keys ----
    let sender = fixed_keypair(5)?;
    let receiver = fixed_keypair(9)?;

    // ---- balances ----
    let sender_ct = Ciphertext::encrypt(
        &params,
        1_234,
        &Scalar::from(42u64),
        sender.public().as_point(),
    )?;
    let receiver_ct = Ciphertext::zero();
    let set = AnonymitySet::new(vec![
        Account::new(*sender.public(), sender_ct),
        Account::new(*receiver.public(), receiver_ct),
    ])?;

    // ===================== TRANSFER =====================
    let mut rng = ChaCha20Rng::from_seed(VECTOR_SEED);
    let (transfer, transfer_req) = prepare_transfer(
        &params,
        &TransferInput {
            anonymity_set: &set,
            sender_index: 0,
            receiver_index: 1,
            secret: sender.secret(),
            amount: 111,
            remainder: 1_123,
            epoch,
        },
        &mut rng,
    )?;

    // ===================== BURN =====================
    let (burn, burn_req) = prepare_burn(
        &params,
        &BurnInput {
            account: Account::new(*sender.public(), sender_ct),
            secret: sender.secret(),
            amount: 234,
            remainder: 1_000,
            epoch,
        },
    )?;

    let vectors = json!({
        "epoch": epoch,
        "epoch_domain": params.epoch_domain,
        "seed": hex::encode(VECTOR_SEED),
        "sender_pk": hex::encode(sender.public().to_bytes()),
        "receiver_pk": hex::encode(receiver.public().to_bytes()),
        "sender_ct": hex::encode(sender_ct.to_bytes()),
        "transfer": {
            "amount": 111,
            "remainder": 1_123,
            "bundle": hex::encode(transfer.to_wire()),
            "digest": hex::encode(transfer_req.digest()),
            "request": hex::encode(transfer_req.to_wire()),
        },
        "burn": {
            "amount": 234,
            "remainder": 1_000,
            "bundle": hex::encode(burn.to_wire()),
            "digest": hex::encode(burn_req.digest()),
            "request": hex::encode(burn_req.to_wire()),
        },
    });
    Ok(format!("{vectors:#}"))
}
