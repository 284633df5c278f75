//! External collaborators, injected as capabilities.
//!
//! The prover and the epoch source are opaque to this crate. Anything that
//! implements the traits can be plugged in: a remote service, an in-process
//! proof library, or a mock.

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use zether_primitives::ProverRequest;

use crate::ClientError;

/// Turns a prover request into an opaque proof.
///
/// The channel to the prover carries the secret key and randomizer, so it
/// must be trusted and confidential. Implementations report transport or
/// proving failures as [`ClientError::ProverUnavailable`].
pub trait ProverService {
    fn prove(&self, request: &ProverRequest) -> Result<Vec<u8>, ClientError>;
}

impl<T: ProverService + ?Sized> ProverService for &T {
    fn prove(&self, request: &ProverRequest) -> Result<Vec<u8>, ClientError> {
        (**self).prove(request)
    }
}

impl<T: ProverService + ?Sized> ProverService for Box<T> {
    fn prove(&self, request: &ProverRequest) -> Result<Vec<u8>, ClientError> {
        (**self).prove(request)
    }
}

impl<T: ProverService + ?Sized> ProverService for Arc<T> {
    fn prove(&self, request: &ProverRequest) -> Result<Vec<u8>, ClientError> {
        (**self).prove(request)
    }
}

/// Adapts a closure into a [`ProverService`].
pub struct FnProver<F>(pub F);

impl<F> ProverService for FnProver<F>
where
    F: Fn(&ProverRequest) -> Result<Vec<u8>, ClientError>,
{
    fn prove(&self, request: &ProverRequest) -> Result<Vec<u8>, ClientError> {
        (self.0)(request)
    }
}

/// Supplies the current epoch. Monotonicity is the source's responsibility;
/// the value is used as-is.
pub trait EpochSource {
    fn current_epoch(&self) -> Result<u64, ClientError>;
}

impl<T: EpochSource + ?Sized> EpochSource for &T {
    fn current_epoch(&self) -> Result<u64, ClientError> {
        (**self).current_epoch()
    }
}

impl<T: EpochSource + ?Sized> EpochSource for Arc<T> {
    fn current_epoch(&self) -> Result<u64, ClientError> {
        (**self).current_epoch()
    }
}

/// Always the same epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedEpoch(pub u64);

impl EpochSource for FixedEpoch {
    fn current_epoch(&self) -> Result<u64, ClientError> {
        Ok(self.0)
    }
}

/// `floor(nanos_since_unix_epoch / epoch_length)` from the local clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockEpoch {
    pub epoch_length: Duration,
}

impl ClockEpoch {
    pub fn new(epoch_length: Duration) -> Self {
        Self { epoch_length }
    }

    pub fn epoch_at(&self, at: SystemTime) -> Result<u64, ClientError> {
        let len = self.epoch_length.as_nanos();
        if len == 0 {
            return Err(ClientError::EpochUnavailable("zero epoch length".into()));
        }
        let since = at
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ClientError::EpochUnavailable(e.to_string()))?;
        u64::try_from(since.as_nanos() / len)
            .map_err(|_| ClientError::EpochUnavailable("epoch does not fit in u64".into()))
    }
}

impl EpochSource for ClockEpoch {
    fn current_epoch(&self) -> Result<u64, ClientError> {
        self.epoch_at(SystemTime::now())
    }
}
