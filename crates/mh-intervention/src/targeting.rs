//! Peer-support programme enrolment.

use mh_core::{AgentId, PeerSupportTargeting, RngStream, Substream};
use mh_network::SocialNetwork;

/// Priority orders for programme enrolment, fixed for the lifetime of a run.
///
/// Enrolling a coverage fraction `c` takes the first `round(c · n)` agents
/// of the order selected by the targeting strategy, so raising coverage
/// always enrols a superset of the previous participants.
#[derive(Clone, Debug)]
pub struct Enrolment {
    /// Seeded random permutation of all agents.
    random:    Vec<AgentId>,
    /// Agents by degree, highest first, ties by ascending id.
    by_degree: Vec<AgentId>,
}

impl Enrolment {
    pub fn new(network: &SocialNetwork, stream: RngStream) -> Self {
        let n = network.node_count() as u32;

        let mut random: Vec<AgentId> = (0..n).map(AgentId).collect();
        stream.substream(Substream::Enrolment).shuffle(&mut random);

        let mut by_degree: Vec<AgentId> = (0..n).map(AgentId).collect();
        by_degree.sort_by_key(|&a| (std::cmp::Reverse(network.degree(a)), a));

        Self { random, by_degree }
    }

    pub fn order(&self, targeting: PeerSupportTargeting) -> &[AgentId] {
        match targeting {
            PeerSupportTargeting::Random        => &self.random,
            PeerSupportTargeting::HighestDegree => &self.by_degree,
        }
    }

    /// Per-agent membership flags for `coverage` under `targeting`.
    pub fn members(&self, coverage: f64, targeting: PeerSupportTargeting) -> Vec<bool> {
        let order = self.order(targeting);
        let k = ((coverage.clamp(0.0, 1.0) * order.len() as f64).round() as usize).min(order.len());
        let mut flags = vec![false; order.len()];
        for a in &order[..k] {
            flags[a.index()] = true;
        }
        flags
    }
}
