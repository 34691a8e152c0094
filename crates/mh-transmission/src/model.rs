//! The `TransmissionModel` trait — the seam for alternative update rules.

use mh_agent::AgentUpdate;
use mh_core::{AgentId, AgentRng, Thresholds, TransmissionParams};

use crate::TickContext;

/// Pluggable per-agent update rule.
///
/// `update` computes one agent's next-tick scores, state and treatment
/// flags from the pre-tick [`TickContext`].  It must not depend on the order
/// in which agents are processed, and all randomness must come from `rng`
/// (seeded from the run seed, the agent, and the tick), so results are
/// identical whether the engine runs sequentially or on Rayon.
///
/// Implementations report raw results; range checking is done by the
/// engine, which turns any out-of-range score into a numeric-invariant
/// error instead of clamping it.
pub trait TransmissionModel: Send + Sync + 'static {
    fn update(&self, agent: AgentId, ctx: &TickContext<'_>, rng: &mut AgentRng) -> AgentUpdate;

    /// Adopt the calibration of a newly initialised or restored run.
    ///
    /// Default: ignore it (the model carries its own constants).
    fn configure(&mut self, _params: &TransmissionParams, _thresholds: &Thresholds) {}
}
