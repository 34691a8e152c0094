//! Unit tests for mh-network.

#[cfg(test)]
mod helpers {
    use mh_core::{AgentId, Settlement};

    use crate::{NodeAttributes, RelationKind, SocialNetwork, SocialNetworkBuilder};

    /// Triangle 0-1-2 with a pendant 2-3.
    pub fn triangle_with_tail() -> SocialNetwork {
        let mut b = SocialNetworkBuilder::new(4);
        b.add_edge(AgentId(0), AgentId(1), RelationKind::Peer, 1.0).unwrap();
        b.add_edge(AgentId(1), AgentId(2), RelationKind::Family, 0.7).unwrap();
        b.add_edge(AgentId(2), AgentId(0), RelationKind::Peer, 0.5).unwrap();
        b.add_edge(AgentId(3), AgentId(2), RelationKind::Digital, 0.3).unwrap();
        b.build()
    }

    /// `n` agents alternating settlement, cycling through four ethnicities,
    /// with `hours` social-media use each.
    pub fn mixed_nodes(n: usize, hours: f64) -> Vec<NodeAttributes> {
        (0..n)
            .map(|i| NodeAttributes {
                settlement:         if i % 2 == 0 { Settlement::Informal } else { Settlement::Formal },
                ethnicity:          (i % 4) as u8,
                social_media_hours: hours,
            })
            .collect()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use mh_core::AgentId;

    use crate::{NetworkError, RelationKind, SocialNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = SocialNetworkBuilder::new(5).build();
        assert_eq!(net.node_count(), 5);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert_eq!(net.mean_degree(), 0.0);
        assert_eq!(net.clustering_coefficient(), 0.0);
    }

    #[test]
    fn duplicate_edges_are_ignored_in_either_orientation() {
        let mut b = SocialNetworkBuilder::new(3);
        assert!(b.add_edge(AgentId(0), AgentId(1), RelationKind::Peer, 0.5).unwrap());
        assert!(!b.add_edge(AgentId(1), AgentId(0), RelationKind::Digital, 0.9).unwrap());
        assert!(b.contains(AgentId(1), AgentId(0)));
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        // First insertion wins.
        assert_eq!(net.edges()[0].kind, RelationKind::Peer);
    }

    #[test]
    fn self_loop_rejected() {
        let mut b = SocialNetworkBuilder::new(3);
        let err = b.add_edge(AgentId(2), AgentId(2), RelationKind::Peer, 0.5).unwrap_err();
        assert!(matches!(err, NetworkError::SelfLoop(AgentId(2))));
    }

    #[test]
    fn out_of_range_rejected() {
        let mut b = SocialNetworkBuilder::new(3);
        let err = b.add_edge(AgentId(0), AgentId(3), RelationKind::Peer, 0.5).unwrap_err();
        assert!(matches!(err, NetworkError::NodeOutOfRange { node_count: 3, .. }));
    }

    #[test]
    fn weight_must_lie_in_half_open_unit_interval() {
        let mut b = SocialNetworkBuilder::new(3);
        for w in [0.0, -0.1, 1.01, f64::NAN] {
            let err = b.add_edge(AgentId(0), AgentId(1), RelationKind::Peer, w).unwrap_err();
            assert!(matches!(err, NetworkError::InvalidWeight { .. }), "weight {w}");
        }
        assert!(b.add_edge(AgentId(0), AgentId(1), RelationKind::Peer, 1.0).unwrap());
    }
}

// ── Adjacency ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod adjacency {
    use mh_core::AgentId;

    use crate::RelationKind;

    #[test]
    fn edges_are_symmetric() {
        let net = super::helpers::triangle_with_tail();
        for e in net.edges() {
            assert!(e.a < e.b);
            assert!(net.has_edge(e.a, e.b));
            assert!(net.has_edge(e.b, e.a));
            let back = net.neighbors(e.b).iter().find(|n| n.agent == e.a).unwrap();
            assert_eq!(back.kind, e.kind);
            assert_eq!(back.weight, e.weight);
        }
    }

    #[test]
    fn neighbors_sorted_with_attributes() {
        let net = super::helpers::triangle_with_tail();
        let n2: Vec<_> = net.neighbors(AgentId(2)).iter().map(|n| n.agent).collect();
        assert_eq!(n2, vec![AgentId(0), AgentId(1), AgentId(3)]);

        let tail = net.neighbors(AgentId(3));
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].kind, RelationKind::Digital);
        assert_eq!(tail[0].weight, 0.3);
        assert_eq!(net.edge(tail[0].edge).unwrap().kind, RelationKind::Digital);
    }

    #[test]
    fn degree_and_counts() {
        let net = super::helpers::triangle_with_tail();
        assert_eq!(net.degree(AgentId(2)), 3);
        assert_eq!(net.degree(AgentId(3)), 1);
        assert_eq!(net.mean_degree(), 2.0);
        assert_eq!(net.count_of_kind(RelationKind::Peer), 2);
        assert_eq!(net.count_of_kind(RelationKind::Family), 1);
        assert!(!net.has_edge(AgentId(0), AgentId(3)));
        assert!(!net.has_edge(AgentId(0), AgentId(99)));
    }
}

// ── Clustering ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clustering {
    use mh_core::AgentId;

    use crate::{RelationKind, SocialNetworkBuilder};

    #[test]
    fn triangle_is_fully_clustered() {
        let mut b = SocialNetworkBuilder::new(3);
        b.add_edge(AgentId(0), AgentId(1), RelationKind::Peer, 1.0).unwrap();
        b.add_edge(AgentId(1), AgentId(2), RelationKind::Peer, 1.0).unwrap();
        b.add_edge(AgentId(0), AgentId(2), RelationKind::Peer, 1.0).unwrap();
        let net = b.build();
        assert!((net.clustering_coefficient() - 1.0).abs() < 1e-12);
        assert!((net.transitivity() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn star_has_no_clustering() {
        let mut b = SocialNetworkBuilder::new(4);
        for leaf in 1..4 {
            b.add_edge(AgentId(0), AgentId(leaf), RelationKind::Peer, 1.0).unwrap();
        }
        let net = b.build();
        assert_eq!(net.clustering_coefficient(), 0.0);
        assert_eq!(net.transitivity(), 0.0);
    }

    #[test]
    fn triangle_with_tail_matches_hand_count() {
        let net = super::helpers::triangle_with_tail();
        // Local: 1, 1, 1/3, 0 (degree-1 node counts as 0).
        let expected = (1.0 + 1.0 + 1.0 / 3.0) / 4.0;
        assert!((net.clustering_coefficient() - expected).abs() < 1e-12);
        // 3 closed triples out of 5 connected triples.
        assert!((net.transitivity() - 0.6).abs() < 1e-12);
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod generator {
    use mh_core::{AgentId, HomophilyConfig, NetworkConfig, RngStream, Settlement, Substream};

    use crate::{HomophilyGenerator, NetworkGenerator, NodeAttributes, RelationKind, generate};

    use super::helpers::mixed_nodes;

    #[test]
    fn mean_degree_near_target_without_self_loops() {
        let nodes = mixed_nodes(500, 3.73);
        let net = generate(&nodes, 8, &HomophilyConfig::default(), 1).unwrap();
        assert_eq!(net.node_count(), 500);
        assert!((net.mean_degree() - 8.0).abs() <= 1.0, "mean degree {}", net.mean_degree());
        assert!(net.edges().iter().all(|e| e.a != e.b));
        for i in 0..500 {
            let id = AgentId(i);
            assert!(net.neighbors(id).iter().all(|n| n.agent != id));
        }
    }

    #[test]
    fn same_seed_same_graph() {
        let nodes = mixed_nodes(200, 2.0);
        let a = generate(&nodes, 10, &HomophilyConfig::default(), 7).unwrap();
        let b = generate(&nodes, 10, &HomophilyConfig::default(), 7).unwrap();
        assert_eq!(a.edges(), b.edges());
        let c = generate(&nodes, 10, &HomophilyConfig::default(), 8).unwrap();
        assert_ne!(a.edges(), c.edges());
    }

    #[test]
    fn avg_degree_must_be_below_population() {
        let nodes = mixed_nodes(8, 1.0);
        let err = generate(&nodes, 8, &HomophilyConfig::default(), 1).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn local_edges_prefer_same_settlement() {
        let nodes = mixed_nodes(600, 3.0);
        let net = generate(&nodes, 10, &HomophilyConfig::default(), 3).unwrap();
        let local: Vec<_> = net.edges().iter().filter(|e| e.kind.is_local()).collect();
        let same = local
            .iter()
            .filter(|e| nodes[e.a.index()].settlement == nodes[e.b.index()].settlement)
            .count();
        // A homophily-blind graph would sit near 0.5.
        let share = same as f64 / local.len() as f64;
        assert!(share > 0.7, "same-settlement share {share}");
    }

    #[test]
    fn digital_edges_ignore_settlement() {
        let nodes = mixed_nodes(600, 3.0);
        let net = generate(&nodes, 10, &HomophilyConfig::default(), 3).unwrap();
        let same_share = |digital: bool| {
            let edges: Vec<_> = net
                .edges()
                .iter()
                .filter(|e| (e.kind == RelationKind::Digital) == digital)
                .collect();
            let same = edges
                .iter()
                .filter(|e| nodes[e.a.index()].settlement == nodes[e.b.index()].settlement)
                .count();
            same as f64 / edges.len() as f64
        };
        let (local, digital) = (same_share(false), same_share(true));
        assert!(local > 0.7, "local same-settlement share {local}");
        assert!((0.4..0.6).contains(&digital), "digital same-settlement share {digital}");
    }

    #[test]
    fn family_ties_only_within_groups() {
        let nodes = mixed_nodes(400, 3.0);
        let net = generate(&nodes, 12, &HomophilyConfig::default(), 5).unwrap();
        let family: Vec<_> =
            net.edges().iter().filter(|e| e.kind == RelationKind::Family).collect();
        assert!(!family.is_empty());
        for e in family {
            let (a, b) = (&nodes[e.a.index()], &nodes[e.b.index()]);
            assert_eq!(a.settlement, b.settlement);
            assert_eq!(a.ethnicity, b.ethnicity);
            assert!(e.weight >= 0.6);
        }
    }

    #[test]
    fn digital_edges_favour_heavy_users() {
        let nodes: Vec<_> = (0..400)
            .map(|i| NodeAttributes {
                settlement:         Settlement::Formal,
                ethnicity:          0,
                social_media_hours: if i < 200 { 6.0 } else { 1.0 },
            })
            .collect();
        let net = generate(&nodes, 10, &HomophilyConfig::default(), 11).unwrap();
        let (mut heavy, mut light) = (0usize, 0usize);
        for e in net.edges().iter().filter(|e| e.kind == RelationKind::Digital) {
            for end in [e.a, e.b] {
                if end.index() < 200 { heavy += 1 } else { light += 1 }
            }
        }
        assert!(heavy > 3 * light, "heavy {heavy} vs light {light}");
    }

    #[test]
    fn no_usage_skips_digital_layer() {
        let nodes = mixed_nodes(100, 0.0);
        let net = generate(&nodes, 6, &HomophilyConfig::default(), 2).unwrap();
        assert_eq!(net.count_of_kind(RelationKind::Digital), 0);
        assert!(net.edge_count() > 0);
    }

    /// Mean degree of the top `share` of agents divided by the overall mean.
    fn top_degree_ratio(net: &crate::SocialNetwork, share: f64) -> f64 {
        let mut degrees: Vec<usize> =
            (0..net.node_count()).map(|i| net.degree(AgentId(i as u32))).collect();
        degrees.sort_unstable_by(|a, b| b.cmp(a));
        let top = ((degrees.len() as f64 * share) as usize).max(1);
        let top_mean = degrees[..top].iter().sum::<usize>() as f64 / top as f64;
        top_mean / net.mean_degree()
    }

    #[test]
    fn hubs_skew_degree_without_moving_the_mean() {
        let nodes = mixed_nodes(600, 3.0);
        let net = generate(&nodes, 10, &HomophilyConfig::default(), 4).unwrap();
        assert!((net.mean_degree() - 10.0).abs() <= 1.0, "mean degree {}", net.mean_degree());
        let ratio = top_degree_ratio(&net, 0.05);
        assert!(ratio > 1.5, "top-5% degree ratio {ratio}");
    }

    #[test]
    fn hub_share_zero_keeps_degrees_flat() {
        let nodes = mixed_nodes(600, 3.0);
        let mut rng = RngStream::new(4).substream(Substream::Network);
        let flat = HomophilyGenerator::new(NetworkConfig {
            avg_connections: 10,
            hub_share:       0.0,
            ..NetworkConfig::default()
        })
        .generate(&nodes, &mut rng)
        .unwrap();
        let hubbed = generate(&nodes, 10, &HomophilyConfig::default(), 4).unwrap();
        assert!(top_degree_ratio(&flat, 0.05) < top_degree_ratio(&hubbed, 0.05));
        assert!((flat.mean_degree() - hubbed.mean_degree()).abs() < 0.5);
    }

    #[test]
    fn hub_share_is_validated() {
        let nodes = mixed_nodes(100, 3.0);
        let generator = HomophilyGenerator::new(NetworkConfig {
            avg_connections: 6,
            hub_share:       1.5,
            ..NetworkConfig::default()
        });
        let mut rng = RngStream::new(1).substream(Substream::Network);
        assert!(generator.generate(&nodes, &mut rng).unwrap_err().is_config());
    }

    #[test]
    fn digital_share_zero_gives_local_only() {
        let nodes = mixed_nodes(100, 3.0);
        let generator = HomophilyGenerator::new(NetworkConfig {
            avg_connections: 6,
            digital_share:   0.0,
            ..NetworkConfig::default()
        });
        let mut rng = RngStream::new(9).substream(Substream::Network);
        let net = generator.generate(&nodes, &mut rng).unwrap();
        assert_eq!(net.count_of_kind(RelationKind::Digital), 0);
        assert_eq!(net.edge_count(), 300);
    }
}
