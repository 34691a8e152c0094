//! Score-update building blocks.
//!
//! Each score moves a fraction of the way toward a logistic target:
//!
//! ```text
//! z      = bias
//!        + peer_influence_strength · m · peer_distress
//!        + ln(loneliness OR) · isolated
//!        + w_env · stress · (env multiplier if informal)
//!        + w_media · media_exposure
//!        − w_prot · protection
//!        − treatment_effect · in_course
//! target = 1 / (1 + e^(−z))
//! new    = old + r · (target − old),   r = clamp(adaptation · susceptibility, 0, 1)
//! ```
//!
//! With both `old` and `target` in `[0, 1]` and `r` in `[0, 1]`, `new` is a
//! convex combination and stays in `[0, 1]` for any finite `z`.

use mh_agent::Population;
use mh_core::{AgentId, TransmissionParams};
use mh_network::{RelationKind, SocialNetwork};

/// Standard logistic function.
#[inline]
pub fn logistic(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Move `old` a fraction `rate` of the way toward `target`.
#[inline]
pub fn relax(old: f64, target: f64, rate: f64) -> f64 {
    old + rate * (target - old)
}

/// Relation-kind multiplier on edge weight.
#[inline]
pub fn relation_weight(params: &TransmissionParams, kind: RelationKind) -> f64 {
    match kind {
        RelationKind::Peer    => params.peer_weight,
        RelationKind::Family  => params.family_weight,
        RelationKind::Digital => params.digital_weight,
    }
}

/// Composite protective factor in `[0, 1]`.
pub fn protection(population: &Population, agent: AgentId) -> f64 {
    let t = population.traits();
    let i = agent.index();
    0.3 * t.resilience[i]
        + 0.3 * t.family_support[i]
        + 0.2 * t.peer_support[i]
        + if t.religious[i] { 0.2 } else { 0.0 }
}

/// What an agent's neighbourhood looked like at the start of the tick.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct NeighbourSignal {
    /// Weighted mean depression over all neighbours.
    pub peer_depression:  f64,
    pub peer_anxiety:     f64,
    /// Σ edge weight × relation multiplier.
    pub effective_weight: f64,
    /// Usage-scaled mean depression over digital neighbours only.
    pub media_depression: f64,
    pub media_anxiety:    f64,
}

impl NeighbourSignal {
    /// Aggregate `agent`'s neighbours from the pre-tick population.
    pub fn gather(
        agent:      AgentId,
        population: &Population,
        network:    &SocialNetwork,
        params:     &TransmissionParams,
    ) -> Self {
        let depression = population.depression();
        let anxiety    = population.anxiety();

        let (mut w_sum, mut dep, mut anx) = (0.0, 0.0, 0.0);
        let (mut d_sum, mut d_dep, mut d_anx) = (0.0, 0.0, 0.0);
        for n in network.neighbors(agent) {
            let j = n.agent.index();
            let w = n.weight * relation_weight(params, n.kind);
            w_sum += w;
            dep   += w * depression[j];
            anx   += w * anxiety[j];
            if n.kind == RelationKind::Digital {
                d_sum += n.weight;
                d_dep += n.weight * depression[j];
                d_anx += n.weight * anxiety[j];
            }
        }

        let usage = population.traits().social_media_hours[agent.index()]
            / mh_core::config::MAX_SOCIAL_MEDIA_HOURS;
        let mean = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };
        Self {
            peer_depression:  mean(dep, w_sum),
            peer_anxiety:     mean(anx, w_sum),
            effective_weight: w_sum,
            media_depression: usage * mean(d_dep, d_sum),
            media_anxiety:    usage * mean(d_anx, d_sum),
        }
    }

    /// Zero or near-zero effective connections.
    #[inline]
    pub fn is_isolated(&self, params: &TransmissionParams) -> bool {
        self.effective_weight < params.isolation_threshold
    }
}
