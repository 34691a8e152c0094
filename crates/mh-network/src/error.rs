//! Network-subsystem error type.

use thiserror::Error;

use mh_core::{AgentId, MhError};

/// Errors produced by `mh-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("{agent} is out of range for a network of {node_count} nodes")]
    NodeOutOfRange { agent: AgentId, node_count: usize },

    #[error("self-loop on {0}")]
    SelfLoop(AgentId),

    #[error("edge weight {weight} between {a} and {b} is outside (0, 1]")]
    InvalidWeight { a: AgentId, b: AgentId, weight: f64 },

    #[error(transparent)]
    Core(#[from] MhError),
}

impl NetworkError {
    pub fn is_config(&self) -> bool {
        matches!(self, NetworkError::Core(e) if e.is_config())
    }
}

pub type NetworkResult<T> = Result<T, NetworkError>;
