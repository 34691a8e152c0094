//! `TransmissionEngine` — runs a model over every agent for one tick.

use log::error;

use mh_agent::{AgentUpdate, PopulationUpdate};
use mh_core::{AgentId, MhError};

use crate::{
    CalibratedTransmission, TickContext, TransmissionError, TransmissionModel, TransmissionResult,
};

/// Drives a [`TransmissionModel`] across the whole population.
///
/// The engine never mutates the population: it returns a
/// [`PopulationUpdate`] for the caller to commit.
#[derive(Clone, Debug, Default)]
pub struct TransmissionEngine<M: TransmissionModel = CalibratedTransmission> {
    pub model: M,
}

impl<M: TransmissionModel> TransmissionEngine<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Compute every agent's next-tick values from `ctx`.
    ///
    /// Fails with a numeric-invariant error for the lowest-id agent whose
    /// depression or anxiety score is not a finite number in `[0, 1]`.
    pub fn compute_tick(&self, ctx: &TickContext<'_>) -> TransmissionResult<PopulationUpdate> {
        let count = ctx.population.count();
        if ctx.network.node_count() != count {
            return Err(TransmissionError::AgentCountMismatch {
                expected: count,
                got:      ctx.network.node_count(),
                what:     "network node count",
            });
        }
        if ctx.effects.treatment_start_probability.len() != count
            || ctx.effects.peer_multiplier.len() != count
        {
            return Err(TransmissionError::AgentCountMismatch {
                expected: count,
                got:      ctx.effects.len(),
                what:     "intervention effects",
            });
        }

        let updates = self.compute_all(ctx, count);

        for (i, u) in updates.iter().enumerate() {
            let agent = AgentId(i as u32);
            for (quantity, value) in [("depression", u.depression), ("anxiety", u.anxiety)] {
                if let Err(e) = MhError::check_unit(quantity, value, agent, ctx.tick) {
                    error!("aborting {}: {e}", ctx.tick);
                    return Err(e.into());
                }
            }
        }

        Ok(PopulationUpdate { agents: updates })
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_all(&self, ctx: &TickContext<'_>, count: usize) -> Vec<AgentUpdate> {
        (0..count as u32)
            .map(|i| {
                let agent = AgentId(i);
                let mut rng = ctx.rng.agent(agent, ctx.tick);
                self.model.update(agent, ctx, &mut rng)
            })
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn compute_all(&self, ctx: &TickContext<'_>, count: usize) -> Vec<AgentUpdate> {
        use rayon::prelude::*;

        // Indexed collect preserves AgentId order.
        (0..count as u32)
            .into_par_iter()
            .map(|i| {
                let agent = AgentId(i);
                let mut rng = ctx.rng.agent(agent, ctx.tick);
                self.model.update(agent, ctx, &mut rng)
            })
            .collect()
    }
}
