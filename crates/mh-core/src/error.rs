//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `MhError` as one variant
//! via `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

use crate::{AgentId, Tick};

/// The top-level error type for `mh-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum MhError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    /// Out-of-range or mutually inconsistent parameters.  Raised at
    /// initialisation (or intervention update) time, never mid-tick.
    #[error("configuration error: {0}")]
    Config(String),

    /// A score or probability escaped its defined bound after computation.
    /// Always a defect; never silently clamped away.
    #[error("numeric invariant violated: {quantity} = {value} for {agent} at {tick}")]
    NumericInvariant {
        agent:    AgentId,
        tick:     Tick,
        quantity: &'static str,
        value:    f64,
    },
}

impl MhError {
    /// Returns `value` unchanged if it is a finite number in `[0, 1]`,
    /// otherwise a [`MhError::NumericInvariant`].
    pub fn check_unit(
        quantity: &'static str,
        value:    f64,
        agent:    AgentId,
        tick:     Tick,
    ) -> MhResult<f64> {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(MhError::NumericInvariant { agent, tick, quantity, value })
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, MhError::Config(_))
    }

    pub fn is_numeric_invariant(&self) -> bool {
        matches!(self, MhError::NumericInvariant { .. })
    }
}

/// Shorthand result type for all `mh-*` crates.
pub type MhResult<T> = Result<T, MhError>;
