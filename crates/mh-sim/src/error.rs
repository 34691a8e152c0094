use thiserror::Error;

use mh_agent::PopulationError;
use mh_core::{MhError, Tick};
use mh_network::NetworkError;
use mh_transmission::TransmissionError;

use crate::SimStatus;

#[derive(Debug, Error)]
pub enum SimError {
    /// The call is not valid in the simulation's current lifecycle state.
    #[error("{op} is not valid while the simulation is {status}")]
    InvalidState { op: &'static str, status: SimStatus },

    #[error("target {target} is before the current tick {current}")]
    TargetInPast { target: Tick, current: Tick },

    #[error("snapshot is inconsistent: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Transmission(#[from] TransmissionError),

    #[error(transparent)]
    Core(#[from] MhError),
}

impl SimError {
    pub fn is_config(&self) -> bool {
        match self {
            SimError::Core(e)       => e.is_config(),
            SimError::Population(e) => e.is_config(),
            SimError::Network(e)    => e.is_config(),
            _ => false,
        }
    }

    pub fn is_numeric_invariant(&self) -> bool {
        match self {
            SimError::Core(e)         => e.is_numeric_invariant(),
            SimError::Population(e)   => e.is_numeric_invariant(),
            SimError::Transmission(e) => e.is_numeric_invariant(),
            _ => false,
        }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, SimError::InvalidState { .. })
    }
}

pub type SimResult<T> = Result<T, SimError>;
