//! Balance recovery: bounded discrete log of `CL - x·CR` against `b·G`.
//!
//! The plaintext space is small by construction, so a linear walk over
//! `[start, end]` is acceptable. Large ranges can be sharded over a rayon
//! pool, or answered from a precomputed [`LookupTable`].

use std::{collections::HashMap, sync::Arc};

use curve25519_dalek::{ristretto::RistrettoPoint, traits::Identity};
use log::{debug, trace};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};
use subtle::ConstantTimeEq;
use zether_primitives::{
    curve::{amount_point, point_to_bytes, G},
    Ciphertext, Params, SecretKey,
};

use crate::{config::MAX_TABLE_GIANT_STEP, ClientConfig, ClientError};

fn check_range(start: u64, end: u64, max: u64) -> Result<(), ClientError> {
    if start > end || end > max {
        return Err(ClientError::InvalidRange { start, end, max });
    }
    Ok(())
}

/// Walk `i·G` for `i ∈ [start, end]` until it equals `target`.
fn scan(target: &RistrettoPoint, start: u64, end: u64) -> Option<u64> {
    let mut candidate = amount_point(start);
    let mut i = start;
    loop {
        if bool::from(candidate.ct_eq(target)) {
            return Some(i);
        }
        if i == end {
            return None;
        }
        candidate += G;
        i += 1;
    }
}

/// Linear-search balance recovery.
#[derive(Clone)]
pub struct BalanceOracle {
    max_balance: u64,
    chunk: u64,
    pool: Option<Arc<ThreadPool>>,
}

impl BalanceOracle {
    /// Builds the worker pool when `search_workers > 1`.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let pool = if config.search_workers > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.search_workers)
                .thread_name(|i| format!("zether-search-{i}"))
                .build()
                .map_err(|e| ClientError::ThreadPool(e.to_string()))?;
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(Self {
            max_balance: config.params.max_balance,
            chunk: config.search_chunk,
            pool,
        })
    }

    pub fn max_balance(&self) -> u64 {
        self.max_balance
    }

    /// Recover the plaintext of `ciphertext` under `secret`, searching
    /// `[start, end]` inclusive.
    ///
    /// # Errors
    /// * `InvalidRange` - `start > end` or `end > max_balance`
    /// * `DecryptionFailure` - no candidate matched; wrong key, corrupted
    ///   ciphertext, or a balance outside the searched range
    pub fn recover(
        &self,
        ciphertext: &Ciphertext,
        secret: &SecretKey,
        start: u64,
        end: u64,
    ) -> Result<u64, ClientError> {
        check_range(start, end, self.max_balance)?;
        let target = ciphertext.decrypt_point(secret.as_scalar());

        let found = match &self.pool {
            Some(pool) if end - start >= self.chunk => {
                pool.install(|| self.search_sharded(&target, start, end))
            }
            _ => scan(&target, start, end),
        };
        debug!(
            "balance search over [{start}, {end}] {}",
            if found.is_some() { "matched" } else { "exhausted" }
        );
        found.ok_or(ClientError::DecryptionFailure { start, end })
    }

    /// The discrete log is unique in range, so the first shard to match wins
    /// and unstarted shards are dropped.
    fn search_sharded(&self, target: &RistrettoPoint, start: u64, end: u64) -> Option<u64> {
        let last = (end - start) / self.chunk;
        trace!("sharding [{start}, {end}] into shards 0..={last} of {}", self.chunk);
        (0..=last).into_par_iter().find_map_any(|s| {
            let lo = start + s * self.chunk;
            let hi = lo.saturating_add(self.chunk - 1).min(end);
            scan(target, lo, hi)
        })
    }
}

/// Baby-step/giant-step table: `j·G` for `j < m`, keyed by encoding.
///
/// Drop-in alternative to [`BalanceOracle`] with the same validation and
/// errors; a search costs `range / m` lookups instead of `range` additions.
pub struct LookupTable {
    max_balance: u64,
    giant_step: u64,
    giant: RistrettoPoint,
    baby_steps: HashMap<[u8; 32], u64>,
}

impl LookupTable {
    pub fn new(params: &Params, giant_step: u64) -> Result<Self, ClientError> {
        if giant_step == 0 || giant_step > MAX_TABLE_GIANT_STEP {
            return Err(ClientError::Config(format!(
                "giant step must be in [1, {MAX_TABLE_GIANT_STEP}]"
            )));
        }
        let m = giant_step.min(params.max_balance.saturating_add(1));
        let mut baby_steps: HashMap<[u8; 32], u64> = HashMap::new();
        baby_steps
            .try_reserve(m as usize)
            .map_err(|e| ClientError::Config(format!("lookup table allocation: {e}")))?;
        let mut p = RistrettoPoint::identity();
        for j in 0..m {
            baby_steps.insert(point_to_bytes(&p), j);
            p += G;
        }
        debug!("built lookup table with {m} baby steps");
        Ok(Self {
            max_balance: params.max_balance,
            giant_step: m,
            giant: p,
            baby_steps,
        })
    }

    pub fn giant_step(&self) -> u64 {
        self.giant_step
    }

    pub fn recover(
        &self,
        ciphertext: &Ciphertext,
        secret: &SecretKey,
        start: u64,
        end: u64,
    ) -> Result<u64, ClientError> {
        check_range(start, end, self.max_balance)?;
        let span = end - start;
        let mut gamma = ciphertext.decrypt_point(secret.as_scalar()) - amount_point(start);
        let mut base = 0u64;
        loop {
            if let Some(&j) = self.baby_steps.get(&point_to_bytes(&gamma)) {
                let offset = base.saturating_add(j);
                if offset <= span {
                    return Ok(start + offset);
                }
                break;
            }
            base = match base.checked_add(self.giant_step) {
                Some(b) if b <= span => b,
                _ => break,
            };
            gamma -= self.giant;
        }
        Err(ClientError::DecryptionFailure { start, end })
    }
}
