use serde::{Deserialize, Serialize};

use crate::Error;

/// Largest balance representable by default (`2^32 - 1`).
pub const DEFAULT_MAX_BALANCE: u64 = u32::MAX as u64;

/// Default hash-to-group domain for epoch tags.
pub const DEFAULT_EPOCH_DOMAIN: &str = "Zether";

/// Scheme parameters shared by every party that touches a ciphertext.
///
/// `max_balance` bounds the plaintext space. It has to stay small enough for
/// brute-force recovery to be practical on the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    pub max_balance: u64,
    pub epoch_domain: String,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_balance: DEFAULT_MAX_BALANCE,
            epoch_domain: DEFAULT_EPOCH_DOMAIN.into(),
        }
    }
}

impl Params {
    pub fn with_max_balance(max_balance: u64) -> Self {
        Self {
            max_balance,
            ..Self::default()
        }
    }

    /// Fails with `ValueOutOfRange` unless `value ∈ [0, max_balance]`.
    pub fn check_amount(&self, value: u64) -> Result<u64, Error> {
        if value > self.max_balance {
            return Err(Error::ValueOutOfRange {
                value,
                max: self.max_balance,
            });
        }
        Ok(value)
    }

    pub fn domain_bytes(&self) -> &[u8] {
        self.epoch_domain.as_bytes()
    }
}
