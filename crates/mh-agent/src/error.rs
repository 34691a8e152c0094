//! Population error type.

use thiserror::Error;

use mh_core::{AgentId, MhError};

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("history of {agent} has {got} entries, expected {expected}")]
    HistoryLength {
        agent:    AgentId,
        expected: usize,
        got:      usize,
    },

    #[error(transparent)]
    Core(#[from] MhError),
}

impl PopulationError {
    pub fn is_config(&self) -> bool {
        matches!(self, PopulationError::Core(e) if e.is_config())
    }

    pub fn is_numeric_invariant(&self) -> bool {
        matches!(self, PopulationError::Core(e) if e.is_numeric_invariant())
    }
}

pub type PopulationResult<T> = Result<T, PopulationError>;
