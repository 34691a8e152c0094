//! Social network representation and builder.
//!
//! # Data layout
//!
//! The graph is undirected.  Each edge is stored once in a canonical list
//! (`a < b`, sorted by `(a, b)`, indexed by `EdgeId`) and twice in a
//! **Compressed Sparse Row** adjacency, once per endpoint.  The neighbours of
//! agent `i` occupy the contiguous slice
//!
//! ```text
//! adjacency[ offsets[i] .. offsets[i+1] ]
//! ```
//!
//! sorted by neighbour id, so `neighbors()` is O(1) to obtain and O(degree)
//! to scan, and `has_edge()` is a binary search.
//!
//! The graph never changes after [`SocialNetworkBuilder::build`], so the
//! clustering metrics are computed once there and cached.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashSet;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashSet as HashSet;

use mh_core::{AgentId, EdgeId};

use crate::{NetworkError, NetworkResult};

// ── Relation kinds ────────────────────────────────────────────────────────────

/// Kind of relationship an edge represents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RelationKind {
    Peer,
    Family,
    Digital,
}

impl RelationKind {
    pub const ALL: [RelationKind; 3] = [RelationKind::Peer, RelationKind::Family, RelationKind::Digital];

    /// Peer and family ties are geographically and socially local.
    #[inline]
    pub fn is_local(self) -> bool {
        !matches!(self, RelationKind::Digital)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Peer    => "peer",
            RelationKind::Family  => "family",
            RelationKind::Digital => "digital",
        }
    }
}

/// One undirected edge in canonical form (`a < b`).
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a:      AgentId,
    pub b:      AgentId,
    pub kind:   RelationKind,
    /// Tie strength in `(0, 1]`.
    pub weight: f64,
}

/// One adjacency entry as seen from a particular agent.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Neighbor {
    pub agent:  AgentId,
    pub kind:   RelationKind,
    pub weight: f64,
    pub edge:   EdgeId,
}

// ── SocialNetwork ─────────────────────────────────────────────────────────────

/// Undirected, de-duplicated, self-loop-free relationship graph.
///
/// Do not construct directly; use [`SocialNetworkBuilder`] or a
/// [`NetworkGenerator`](crate::NetworkGenerator).
#[derive(Clone, Debug)]
pub struct SocialNetwork {
    /// CSR row pointer.  Length = `node_count + 1`.
    offsets:      Vec<u32>,
    adjacency:    Vec<Neighbor>,
    edges:        Vec<Edge>,
    clustering:   f64,
    transitivity: f64,
}

impl SocialNetwork {
    /// A network over `node_count` agents with no edges.
    pub fn empty(node_count: usize) -> Self {
        SocialNetworkBuilder::new(node_count).build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Mean number of neighbours per agent (`2E / N`).
    pub fn mean_degree(&self) -> f64 {
        match self.node_count() {
            0 => 0.0,
            n => 2.0 * self.edges.len() as f64 / n as f64,
        }
    }

    /// Number of edges of relation `kind`.
    pub fn count_of_kind(&self, kind: RelationKind) -> usize {
        self.edges.iter().filter(|e| e.kind == kind).count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// All neighbours of `agent` with their relation kind and weight, sorted
    /// by neighbour id.
    #[inline]
    pub fn neighbors(&self, agent: AgentId) -> &[Neighbor] {
        let start = self.offsets[agent.index()] as usize;
        let end   = self.offsets[agent.index() + 1] as usize;
        &self.adjacency[start..end]
    }

    #[inline]
    pub fn degree(&self, agent: AgentId) -> usize {
        let start = self.offsets[agent.index()] as usize;
        let end   = self.offsets[agent.index() + 1] as usize;
        end - start
    }

    /// `true` if `a` and `b` are adjacent (either direction).
    pub fn has_edge(&self, a: AgentId, b: AgentId) -> bool {
        if a.index() >= self.node_count() || b.index() >= self.node_count() {
            return false;
        }
        self.neighbors(a)
            .binary_search_by_key(&b, |n| n.agent)
            .is_ok()
    }

    /// Canonical edge list, sorted by `(a, b)` and indexed by `EdgeId`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    // ── Clustering ────────────────────────────────────────────────────────

    /// Average local clustering coefficient.  Agents with fewer than two
    /// neighbours contribute 0.
    #[inline]
    pub fn clustering_coefficient(&self) -> f64 {
        self.clustering
    }

    /// Global transitivity: `3 × triangles / connected triples`.
    #[inline]
    pub fn transitivity(&self) -> f64 {
        self.transitivity
    }

    /// Count, for every agent, the triangles it belongs to.
    ///
    /// Each edge `(u, v)` merges the two sorted neighbour lists; every common
    /// neighbour `w` closes the triangle `{u, v, w}` opposite `w`, so each
    /// agent is credited exactly once per triangle.
    fn triangles_per_node(&self) -> Vec<u64> {
        let mut triangles = vec![0u64; self.node_count()];
        for edge in &self.edges {
            let left  = self.neighbors(edge.a);
            let right = self.neighbors(edge.b);
            let (mut i, mut j) = (0, 0);
            while i < left.len() && j < right.len() {
                match left[i].agent.cmp(&right[j].agent) {
                    std::cmp::Ordering::Less    => i += 1,
                    std::cmp::Ordering::Greater => j += 1,
                    std::cmp::Ordering::Equal   => {
                        triangles[left[i].agent.index()] += 1;
                        i += 1;
                        j += 1;
                    }
                }
            }
        }
        triangles
    }

    fn compute_clustering(&mut self) {
        let n = self.node_count();
        if n == 0 {
            return;
        }
        let triangles = self.triangles_per_node();

        let mut local_sum     = 0.0;
        let mut closed        = 0u64;
        let mut triples       = 0u64;
        for (i, &t) in triangles.iter().enumerate() {
            let k = self.degree(AgentId(i as u32)) as u64;
            if k < 2 {
                continue;
            }
            let pairs = k * (k - 1) / 2;
            local_sum += t as f64 / pairs as f64;
            closed    += t;
            triples   += pairs;
        }

        self.clustering   = local_sum / n as f64;
        self.transitivity = if triples == 0 { 0.0 } else { closed as f64 / triples as f64 };
    }
}

// ── SocialNetworkBuilder ──────────────────────────────────────────────────────

/// Construct a [`SocialNetwork`] incrementally, then call [`build`](Self::build).
///
/// Edges may be added in any order and orientation.  A second edge between
/// the same pair is ignored (the first relation kind wins); self-loops and
/// weights outside `(0, 1]` are rejected.
///
/// # Example
///
/// ```
/// use mh_core::AgentId;
/// use mh_network::{RelationKind, SocialNetworkBuilder};
///
/// let mut b = SocialNetworkBuilder::new(3);
/// b.add_edge(AgentId(0), AgentId(1), RelationKind::Peer, 0.8).unwrap();
/// b.add_edge(AgentId(2), AgentId(1), RelationKind::Digital, 0.4).unwrap();
/// let net = b.build();
/// assert_eq!(net.edge_count(), 2);
/// assert_eq!(net.degree(AgentId(1)), 2);
/// ```
pub struct SocialNetworkBuilder {
    node_count: usize,
    edges:      Vec<Edge>,
    seen:       HashSet<(u32, u32)>,
}

impl SocialNetworkBuilder {
    pub fn new(node_count: usize) -> Self {
        Self::with_capacity(node_count, 0)
    }

    /// Pre-allocate for the expected number of edges.
    pub fn with_capacity(node_count: usize, edges: usize) -> Self {
        let mut seen = HashSet::default();
        seen.reserve(edges);
        Self {
            node_count,
            edges: Vec::with_capacity(edges),
            seen,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, a: AgentId, b: AgentId) -> bool {
        self.seen.contains(&canonical(a, b))
    }

    /// Add an undirected edge.
    ///
    /// Returns `Ok(true)` if the edge was inserted and `Ok(false)` if the
    /// pair was already connected.
    pub fn add_edge(
        &mut self,
        a:      AgentId,
        b:      AgentId,
        kind:   RelationKind,
        weight: f64,
    ) -> NetworkResult<bool> {
        for agent in [a, b] {
            if agent.index() >= self.node_count {
                return Err(NetworkError::NodeOutOfRange { agent, node_count: self.node_count });
            }
        }
        if a == b {
            return Err(NetworkError::SelfLoop(a));
        }
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(NetworkError::InvalidWeight { a, b, weight });
        }

        let key = canonical(a, b);
        if !self.seen.insert(key) {
            return Ok(false);
        }
        self.edges.push(Edge { a: AgentId(key.0), b: AgentId(key.1), kind, weight });
        Ok(true)
    }

    /// Consume the builder and produce a [`SocialNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort plus O(Σ deg²) worst
    /// case for the triangle count.
    pub fn build(self) -> SocialNetwork {
        let node_count = self.node_count;

        let mut edges = self.edges;
        edges.sort_unstable_by_key(|e| (e.a.0, e.b.0));

        // CSR row pointer from endpoint degrees.
        let mut offsets = vec![0u32; node_count + 1];
        for e in &edges {
            offsets[e.a.index() + 1] += 1;
            offsets[e.b.index() + 1] += 1;
        }
        for i in 1..=node_count {
            offsets[i] += offsets[i - 1];
        }
        debug_assert_eq!(offsets[node_count] as usize, 2 * edges.len());

        let placeholder = Neighbor {
            agent:  AgentId::INVALID,
            kind:   RelationKind::Peer,
            weight: 0.0,
            edge:   EdgeId::INVALID,
        };
        let mut adjacency = vec![placeholder; 2 * edges.len()];
        let mut cursor: Vec<u32> = offsets[..node_count].to_vec();
        for (i, e) in edges.iter().enumerate() {
            let id = EdgeId(i as u32);
            for (from, to) in [(e.a, e.b), (e.b, e.a)] {
                let slot = &mut cursor[from.index()];
                adjacency[*slot as usize] = Neighbor { agent: to, kind: e.kind, weight: e.weight, edge: id };
                *slot += 1;
            }
        }
        for i in 0..node_count {
            let (start, end) = (offsets[i] as usize, offsets[i + 1] as usize);
            adjacency[start..end].sort_unstable_by_key(|n| n.agent);
        }

        let mut network = SocialNetwork {
            offsets,
            adjacency,
            edges,
            clustering:   0.0,
            transitivity: 0.0,
        };
        network.compute_clustering();
        network
    }
}

#[inline]
fn canonical(a: AgentId, b: AgentId) -> (u32, u32) {
    if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) }
}
