//! `mh-transmission` — the per-tick update rule.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`context`]    | `TickContext<'a>`, `InterventionEffects`                   |
//! | [`model`]      | `TransmissionModel` trait                                  |
//! | [`score`]      | Neighbour aggregation, protective term, logistic update    |
//! | [`transition`] | Threshold-with-hysteresis state machine                    |
//! | [`calibrated`] | `CalibratedTransmission` — the default model               |
//! | [`engine`]     | `TransmissionEngine` — runs a model over every agent       |
//! | [`error`]      | `TransmissionError`, `TransmissionResult<T>`               |
//!
//! # Tick pipeline
//!
//! 1. **Compute** (parallel with `parallel`): for each agent, read the
//!    pre-tick `Population` and `SocialNetwork` through a shared
//!    [`TickContext`] and return an `AgentUpdate`.  No agent sees another's
//!    new score.
//! 2. **Validate** (sequential, ascending `AgentId`): every score must be a
//!    finite number in `[0, 1]`; the first offender aborts the tick with a
//!    numeric-invariant error.
//!
//! Committing the resulting `PopulationUpdate` is the caller's job.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                              |
//! |------------|-----------------------------------------------------|
//! | `parallel` | Runs the compute phase on Rayon's thread pool.      |

pub mod calibrated;
pub mod context;
pub mod engine;
pub mod error;
pub mod model;
pub mod score;
pub mod transition;

#[cfg(test)]
mod tests;

pub use calibrated::CalibratedTransmission;
pub use context::{InterventionEffects, TickContext};
pub use engine::TransmissionEngine;
pub use error::{TransmissionError, TransmissionResult};
pub use mh_agent::{AgentUpdate, PopulationUpdate};
pub use model::TransmissionModel;
pub use score::NeighbourSignal;
pub use transition::Transition;
