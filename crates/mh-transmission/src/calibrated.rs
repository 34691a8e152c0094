//! `CalibratedTransmission` — the default update rule.

use mh_agent::AgentUpdate;
use mh_core::{AgentId, AgentRng, ScoreWeights, Thresholds, TransmissionParams};

use crate::score::{logistic, protection, relax};
use crate::transition::next_state;
use crate::{NeighbourSignal, TickContext, TransmissionModel};

/// Logistic peer-contagion model with loneliness, environmental stress,
/// digital exposure, protective factors, and a treatment course.
///
/// Per agent and tick:
///
/// 1. Aggregate neighbour distress from the pre-tick population
///    ([`NeighbourSignal`]).
/// 2. Relax depression and anxiety toward their logistic targets (see
///    [`score`](crate::score)).
/// 3. Roll for treatment start and relapse.  Both rolls are drawn every
///    tick so the stream position never depends on state.
/// 4. Evaluate the state machine on `max(depression, anxiety)`.
#[derive(Clone, Debug, Default)]
pub struct CalibratedTransmission {
    pub params:     TransmissionParams,
    pub thresholds: Thresholds,
}

impl CalibratedTransmission {
    pub fn new(params: TransmissionParams, thresholds: Thresholds) -> Self {
        Self { params, thresholds }
    }

    /// Logit of the target score for one dimension.
    pub(crate) fn logit(&self, weights: &ScoreWeights, peer: f64, media: f64, d: &Drivers) -> f64 {
        let p = &self.params;
        let mut z = weights.bias
            + p.peer_influence_strength * d.peer_factor * peer
            + weights.environment * d.stress
            + weights.media * media
            - weights.protection * d.protection;
        if d.isolated {
            z += p.loneliness_log_odds();
        }
        if d.in_course {
            z -= p.treatment_effect;
        }
        z
    }
}

/// Inputs shared by the depression and anxiety logits.
pub(crate) struct Drivers {
    pub(crate) peer_factor: f64,
    pub(crate) isolated:    bool,
    pub(crate) stress:      f64,
    pub(crate) protection:  f64,
    pub(crate) in_course:   bool,
}

impl TransmissionModel for CalibratedTransmission {
    fn configure(&mut self, params: &TransmissionParams, thresholds: &Thresholds) {
        self.params     = params.clone();
        self.thresholds = thresholds.clone();
    }

    fn update(&self, agent: AgentId, ctx: &TickContext<'_>, rng: &mut AgentRng) -> AgentUpdate {
        let p   = &self.params;
        let pop = ctx.population;
        let i   = agent.index();
        let traits = pop.traits();

        // ── Scores ────────────────────────────────────────────────────────
        let signal   = NeighbourSignal::gather(agent, pop, ctx.network, p);
        let stress   = if traits.settlement[i].is_informal() {
            traits.stress[i] * p.environmental_stress_multiplier
        } else {
            traits.stress[i]
        };
        let was_seeking = pop.seeking_treatment()[i];
        let course      = pop.treatment_ticks()[i];

        let drivers = Drivers {
            peer_factor: ctx.effects.peer_multiplier[i],
            isolated:    signal.is_isolated(p),
            stress,
            protection:  protection(pop, agent),
            in_course:   was_seeking && course >= p.min_treatment_ticks,
        };
        let z_dep = self.logit(&p.depression, signal.peer_depression, signal.media_depression, &drivers);
        let z_anx = self.logit(&p.anxiety, signal.peer_anxiety, signal.media_anxiety, &drivers);

        let rate = (p.adaptation_rate * traits.susceptibility[i]).clamp(0.0, 1.0);
        let (old_dep, old_anx) = (pop.depression()[i], pop.anxiety()[i]);
        let depression = relax(old_dep, logistic(z_dep), rate);
        let anxiety    = relax(old_anx, logistic(z_anx), rate);

        // ── Treatment ─────────────────────────────────────────────────────
        let seek_roll    = rng.unit();
        let relapse_roll = rng.unit();

        let started = !was_seeking && seek_roll < ctx.effects.treatment_start_probability[i];
        let mut seeking         = was_seeking || started;
        let mut treatment_ticks = if was_seeking { course.saturating_add(1) } else { 0 };

        // ── State transition ──────────────────────────────────────────────
        let transition = next_state(
            &self.thresholds,
            pop.state(agent),
            depression.max(anxiety),
            old_dep.max(old_anx),
            pop.ticks_above()[i],
            seeking,
            relapse_roll,
        );
        if transition.ends_treatment {
            seeking         = false;
            treatment_ticks = 0;
        }

        AgentUpdate {
            state: transition.state,
            depression,
            anxiety,
            seeking_treatment: seeking,
            treatment_ticks,
            ticks_above: transition.ticks_above,
        }
    }
}
