use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use zether_primitives::Params;

use crate::ClientError;

/// Largest accepted `table_giant_step`. The table holds one entry per baby
/// step.
pub const MAX_TABLE_GIANT_STEP: u64 = 1 << 24;

/// Client tuning. Scheme parameters live in [`Params`]; everything else only
/// affects how fast balances are recovered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub params: Params,
    /// Worker threads for balance recovery. `1` searches on the caller's
    /// thread.
    pub search_workers: usize,
    /// Candidates per shard handed to a worker.
    pub search_chunk: u64,
    /// Baby-step count for [`crate::LookupTable`], at most
    /// [`MAX_TABLE_GIANT_STEP`].
    pub table_giant_step: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            search_workers: 1,
            search_chunk: 1 << 16,
            table_giant_step: 1 << 16,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ClientError> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ClientError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.params.max_balance == 0 {
            return Err(ClientError::Config("max_balance must be positive".into()));
        }
        if self.params.epoch_domain.is_empty() {
            return Err(ClientError::Config("epoch_domain must not be empty".into()));
        }
        if self.search_workers == 0 {
            return Err(ClientError::Config("search_workers must be at least 1".into()));
        }
        if self.search_chunk == 0 || self.table_giant_step == 0 {
            return Err(ClientError::Config(
                "search_chunk and table_giant_step must be positive".into(),
            ));
        }
        if self.table_giant_step > MAX_TABLE_GIANT_STEP {
            return Err(ClientError::Config(format!(
                "table_giant_step must be at most {MAX_TABLE_GIANT_STEP}"
            )));
        }
        Ok(())
    }
}
