use thiserror::Error;

use mh_core::MhError;

#[derive(Debug, Error)]
pub enum TransmissionError {
    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] MhError),
}

impl TransmissionError {
    pub fn is_numeric_invariant(&self) -> bool {
        matches!(self, TransmissionError::Core(e) if e.is_numeric_invariant())
    }
}

pub type TransmissionResult<T> = Result<T, TransmissionError>;
