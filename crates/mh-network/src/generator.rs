//! Network generation.
//!
//! [`NetworkGenerator`] is the seam between the simulation and any particular
//! graph-construction algorithm.  The bundled [`HomophilyGenerator`] builds
//! the two-layer topology:
//!
//! 1. **Local layer** (peer + family).  Agents are placed on a ring ordered
//!    by `(settlement, ethnicity)`, each agent links to its nearest ring
//!    successors, and each link is rewired with probability
//!    `rewire_probability` to a homophily-biased random partner
//!    (Watts–Strogatz style).  Random homophily-biased edges then top the
//!    layer up to its edge budget.
//! 2. **Hubs**.  A `hub_share` fraction of agents each receive
//!    `avg_connections` extra homophily-biased local ties.  The hub edges
//!    come out of the local budget, so the mean degree is unchanged.
//! 3. **Digital layer**.  Both endpoints are drawn with probability
//!    proportional to daily social-media hours, ignoring settlement and
//!    ethnicity entirely.

use log::{trace, warn};
use rand::distributions::{Distribution, WeightedIndex};

use mh_core::{
    AgentId, HomophilyConfig, MhError, NetworkConfig, RngStream, Settlement, SimRng, Substream,
};

use crate::{NetworkResult, RelationKind, SocialNetwork, SocialNetworkBuilder};

/// Candidate draws per homophily-biased partner search.
const PARTNER_TRIES: usize = 32;

/// The agent attributes a generator may condition on.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct NodeAttributes {
    pub settlement:         Settlement,
    pub ethnicity:          u8,
    pub social_media_hours: f64,
}

/// Builds the static relationship graph for a run.
///
/// Implementations must draw all randomness from `rng` so that a fixed seed
/// yields an identical graph.
pub trait NetworkGenerator: Send + Sync {
    fn generate(&self, nodes: &[NodeAttributes], rng: &mut SimRng) -> NetworkResult<SocialNetwork>;
}

// ── HomophilyGenerator ────────────────────────────────────────────────────────

/// Small-world local layer with settlement/ethnicity homophily plus a
/// usage-weighted digital overlay.
#[derive(Clone, Debug, Default)]
pub struct HomophilyGenerator {
    pub config: NetworkConfig,
}

impl HomophilyGenerator {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// Acceptance probability for a tie between `a` and `b`.
    #[inline]
    fn affinity(&self, a: &NodeAttributes, b: &NodeAttributes) -> f64 {
        let h = &self.config.homophily;
        let settlement = if a.settlement == b.settlement { 1.0 } else { 1.0 - h.settlement_bias };
        let ethnicity  = if a.ethnicity == b.ethnicity { 1.0 } else { 1.0 - h.ethnicity_bias };
        settlement * ethnicity
    }

    /// Rejection-sample a partner for `a`, accepting each candidate with its
    /// affinity.  Falls back to the last candidate drawn so that strongly
    /// biased configs still make progress.
    fn pick_partner(&self, a: usize, nodes: &[NodeAttributes], rng: &mut SimRng) -> Option<usize> {
        let n = nodes.len();
        let mut last = None;
        for _ in 0..PARTNER_TRIES {
            let c = rng.gen_range(0..n);
            if c == a {
                continue;
            }
            if rng.random::<f64>() < self.affinity(&nodes[a], &nodes[c]) {
                return Some(c);
            }
            last = Some(c);
        }
        last
    }

    /// Insert one local edge, typing it as family or peer.
    fn add_local(
        &self,
        builder: &mut SocialNetworkBuilder,
        nodes:   &[NodeAttributes],
        a:       usize,
        b:       usize,
        rng:     &mut SimRng,
    ) -> NetworkResult<bool> {
        let (na, nb) = (&nodes[a], &nodes[b]);
        let same_group = na.settlement == nb.settlement && na.ethnicity == nb.ethnicity;
        let (kind, weight) = if same_group && rng.gen_bool(self.config.family_share) {
            (RelationKind::Family, rng.gen_range(0.6..=1.0))
        } else {
            (RelationKind::Peer, rng.gen_range(0.3..=1.0))
        };
        builder.add_edge(AgentId(a as u32), AgentId(b as u32), kind, weight)
    }

    fn local_layer(
        &self,
        builder: &mut SocialNetworkBuilder,
        nodes:   &[NodeAttributes],
        target:  usize,
        rng:     &mut SimRng,
    ) -> NetworkResult<usize> {
        let n = nodes.len();

        let mut ring: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut ring);
        ring.sort_by_key(|&i| (nodes[i].settlement.is_informal(), nodes[i].ethnicity));

        let mut added = 0usize;
        let half = target / n;
        for pos in 0..n {
            let a = ring[pos];
            for k in 1..=half {
                let mut b = ring[(pos + k) % n];
                if rng.gen_bool(self.config.rewire_probability) {
                    if let Some(c) = self.pick_partner(a, nodes, rng) {
                        b = c;
                    }
                }
                if self.add_local(builder, nodes, a, b, rng)? {
                    added += 1;
                }
            }
        }
        trace!("local lattice: {added} edges from {half} successors per agent");

        let cap = 20 * target + 100;
        let mut attempts = 0;
        while added < target && attempts < cap {
            attempts += 1;
            let a = rng.gen_range(0..n);
            let Some(b) = self.pick_partner(a, nodes, rng) else { continue };
            if self.add_local(builder, nodes, a, b, rng)? {
                added += 1;
            }
        }
        if added < target {
            warn!("local layer reached {added} of {target} edges after {attempts} top-up attempts");
        }
        Ok(added)
    }

    /// Give `hubs` distinct agents up to `per_hub` extra local ties each.
    fn hub_layer(
        &self,
        builder: &mut SocialNetworkBuilder,
        nodes:   &[NodeAttributes],
        hubs:    usize,
        per_hub: usize,
        rng:     &mut SimRng,
    ) -> NetworkResult<usize> {
        let n = nodes.len();
        let mut order: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut order);

        let mut added = 0usize;
        for &hub in order.iter().take(hubs) {
            let (mut linked, mut attempts) = (0usize, 0usize);
            while linked < per_hub && attempts < 4 * per_hub + 8 {
                attempts += 1;
                let Some(b) = self.pick_partner(hub, nodes, rng) else { continue };
                if self.add_local(builder, nodes, hub, b, rng)? {
                    linked += 1;
                }
            }
            added += linked;
        }
        trace!("hubs: {hubs} agents, {added} extra edges");
        Ok(added)
    }

    fn digital_layer(
        &self,
        builder: &mut SocialNetworkBuilder,
        nodes:   &[NodeAttributes],
        target:  usize,
        rng:     &mut SimRng,
    ) -> NetworkResult<usize> {
        if target == 0 {
            return Ok(0);
        }
        let hours: Vec<f64> = nodes.iter().map(|n| n.social_media_hours.max(0.0)).collect();
        if hours.iter().all(|&h| h == 0.0) {
            warn!("no agent reports social-media use; skipping {target} digital edges");
            return Ok(0);
        }
        let dist = WeightedIndex::new(&hours)
            .map_err(|e| MhError::Config(format!("invalid social-media usage weights: {e}")))?;

        let cap = 20 * target + 100;
        let (mut added, mut attempts) = (0usize, 0usize);
        while added < target && attempts < cap {
            attempts += 1;
            let a = dist.sample(rng.inner());
            let b = dist.sample(rng.inner());
            if a == b {
                continue;
            }
            let weight = rng.gen_range(0.2..=0.8);
            if builder.add_edge(AgentId(a as u32), AgentId(b as u32), RelationKind::Digital, weight)? {
                added += 1;
            }
        }
        if added < target {
            warn!("digital layer reached {added} of {target} edges after {attempts} attempts");
        }
        Ok(added)
    }
}

impl NetworkGenerator for HomophilyGenerator {
    fn generate(&self, nodes: &[NodeAttributes], rng: &mut SimRng) -> NetworkResult<SocialNetwork> {
        let n = nodes.len();
        self.config.validate(n)?;

        let total   = (n as f64 * self.config.avg_connections as f64 / 2.0).round() as usize;
        let digital = (total as f64 * self.config.digital_share).round() as usize;
        let local   = total - digital;

        // Hub ties never take more than half of the local budget.
        let hubs    = (n as f64 * self.config.hub_share) as usize;
        let per_hub = match hubs {
            0 => 0,
            h => self.config.avg_connections.min(local / 2 / h),
        };

        let mut builder = SocialNetworkBuilder::with_capacity(n, total);
        let mut local_added = self.local_layer(&mut builder, nodes, local - hubs * per_hub, rng)?;
        local_added += self.hub_layer(&mut builder, nodes, hubs, per_hub, rng)?;
        let digital_added = self.digital_layer(&mut builder, nodes, digital, rng)?;

        let network = builder.build();
        trace!(
            "generated network: {n} agents, {local_added} local + {digital_added} digital edges, \
             mean degree {:.2}",
            network.mean_degree()
        );
        Ok(network)
    }
}

/// Generate a network with default layer shares for the given mean degree,
/// homophily, and seed.
pub fn generate(
    nodes:      &[NodeAttributes],
    avg_degree: usize,
    homophily:  &HomophilyConfig,
    seed:       u64,
) -> NetworkResult<SocialNetwork> {
    let generator = HomophilyGenerator::new(NetworkConfig {
        avg_connections: avg_degree,
        homophily:       homophily.clone(),
        ..NetworkConfig::default()
    });
    let mut rng = RngStream::new(seed).substream(Substream::Network);
    generator.generate(nodes, &mut rng)
}
