//! Unit tests for mh-intervention.

#[cfg(test)]
mod helpers {
    use mh_agent::{AgentUpdate, Population, PopulationBuilder};
    use mh_core::{AgentId, MentalState};
    use mh_network::{RelationKind, SocialNetwork, SocialNetworkBuilder};

    /// Agents cycle through Healthy, AtRisk, Symptomatic, Recovering.
    pub fn mixed_states(n: usize) -> Population {
        let mut pop = PopulationBuilder::new(n, 2).build().unwrap();
        let update = (0..n)
            .map(|i| AgentUpdate {
                state:      MentalState::ALL[i % 4],
                depression: 0.5,
                anxiety:    0.5,
                ..AgentUpdate::default()
            })
            .collect();
        pop.commit(update).unwrap();
        pop
    }

    /// Agent `i` is linked to every agent with a higher id up to `i + i % 5`,
    /// giving a spread of degrees.
    pub fn uneven(n: usize) -> SocialNetwork {
        let mut b = SocialNetworkBuilder::new(n);
        for i in 0..n {
            for j in (i + 1)..(i + 1 + i % 5).min(n) {
                b.add_edge(AgentId(i as u32), AgentId(j as u32), RelationKind::Peer, 0.5).unwrap();
            }
        }
        b.build()
    }
}

#[cfg(test)]
mod targeting {
    use mh_core::{PeerSupportTargeting, RngStream};

    use crate::Enrolment;

    #[test]
    fn coverage_selects_rounded_share() {
        let net = super::helpers::uneven(40);
        let e = Enrolment::new(&net, RngStream::new(1));
        let members = e.members(0.25, PeerSupportTargeting::Random);
        assert_eq!(members.iter().filter(|&&m| m).count(), 10);
        assert!(e.members(0.0, PeerSupportTargeting::Random).iter().all(|&m| !m));
        assert!(e.members(1.0, PeerSupportTargeting::HighestDegree).iter().all(|&m| m));
    }

    #[test]
    fn raising_coverage_enrols_superset() {
        let net = super::helpers::uneven(60);
        let e = Enrolment::new(&net, RngStream::new(9));
        for targeting in [PeerSupportTargeting::Random, PeerSupportTargeting::HighestDegree] {
            let small = e.members(0.2, targeting);
            let large = e.members(0.5, targeting);
            assert!(small.iter().zip(&large).all(|(&s, &l)| !s || l));
        }
    }

    #[test]
    fn highest_degree_order_is_sorted() {
        let net = super::helpers::uneven(30);
        let e = Enrolment::new(&net, RngStream::new(1));
        let order = e.order(PeerSupportTargeting::HighestDegree);
        for w in order.windows(2) {
            let (a, b) = (net.degree(w[0]), net.degree(w[1]));
            assert!(a > b || (a == b && w[0] < w[1]));
        }
    }

    #[test]
    fn random_order_is_seeded() {
        let net = super::helpers::uneven(30);
        let a = Enrolment::new(&net, RngStream::new(4));
        let b = Enrolment::new(&net, RngStream::new(4));
        assert_eq!(a.order(PeerSupportTargeting::Random), b.order(PeerSupportTargeting::Random));
    }
}

#[cfg(test)]
mod manager {
    use mh_core::{InterventionConfig, MentalState, PeerSupportTargeting, RngStream};

    use crate::InterventionManager;

    use super::helpers::{mixed_states, uneven};

    #[test]
    fn baseline_access_only_reaches_symptomatic() {
        let pop = mixed_states(20);
        let net = uneven(20);
        let m = InterventionManager::new(InterventionConfig::default(), &net, RngStream::new(1)).unwrap();
        let fx = m.effects(&pop);
        for (i, &p) in fx.treatment_start_probability.iter().enumerate() {
            let expected = if pop.states()[i] == MentalState::Symptomatic { 0.02 } else { 0.0 };
            assert!((p - expected).abs() < 1e-12, "agent {i}: {p}");
        }
        assert!(fx.peer_multiplier.iter().all(|&m| m == 1.0));
    }

    #[test]
    fn access_boost_multiplies_rate_and_caps() {
        let pop = mixed_states(8);
        let net = uneven(8);
        let cfg = InterventionConfig { treatment_access_boost: 10.0, ..InterventionConfig::default() };
        let m = InterventionManager::new(cfg, &net, RngStream::new(1)).unwrap();
        let p = m.effects(&pop).treatment_start_probability[2];
        assert!((p - 0.2).abs() < 1e-12);

        let cfg = InterventionConfig { treatment_access_boost: 100.0, ..InterventionConfig::default() };
        let m = InterventionManager::new(cfg, &net, RngStream::new(1)).unwrap();
        assert_eq!(m.effects(&pop).treatment_start_probability[2], 1.0);
    }

    #[test]
    fn outreach_scales_with_usage_for_at_risk_and_symptomatic() {
        let pop = mixed_states(40);
        let net = uneven(40);
        let cfg = InterventionConfig { digital_outreach: true, ..InterventionConfig::default() };
        let m = InterventionManager::new(cfg, &net, RngStream::new(1)).unwrap();
        let fx = m.effects(&pop);
        let hours = &pop.traits().social_media_hours;
        for i in 0..40 {
            let p = fx.treatment_start_probability[i];
            let outreach = (0.025 * hours[i]).min(1.0);
            match pop.states()[i] {
                MentalState::AtRisk      => assert!((p - outreach).abs() < 1e-12),
                MentalState::Symptomatic => {
                    let combined = 1.0 - (1.0 - 0.02) * (1.0 - outreach);
                    assert!((p - combined).abs() < 1e-12);
                }
                _ => assert_eq!(p, 0.0),
            }
        }
    }

    #[test]
    fn peer_support_shields_enrolled_agents() {
        let pop = mixed_states(50);
        let net = uneven(50);
        let cfg = InterventionConfig {
            peer_support_coverage:  0.4,
            peer_support_targeting: PeerSupportTargeting::HighestDegree,
            ..InterventionConfig::default()
        };
        let m = InterventionManager::new(cfg, &net, RngStream::new(1)).unwrap();
        assert_eq!(m.enrolled_count(), 20);
        let fx = m.effects(&pop);
        for (i, &mult) in fx.peer_multiplier.iter().enumerate() {
            let expected = if m.enrolled()[i] { 0.5 } else { 1.0 };
            assert_eq!(mult, expected);
        }
    }

    #[test]
    fn invalid_update_keeps_previous_config() {
        let net = uneven(10);
        let mut m = InterventionManager::new(InterventionConfig::default(), &net, RngStream::new(1)).unwrap();
        let bad = InterventionConfig { peer_support_coverage: 1.5, ..InterventionConfig::default() };
        assert!(m.update(bad).unwrap_err().is_config());
        assert_eq!(m.config(), &InterventionConfig::default());
        assert_eq!(m.enrolled_count(), 0);
    }

    #[test]
    fn update_reenrols_on_coverage_change() {
        let net = uneven(10);
        let mut m = InterventionManager::new(InterventionConfig::default(), &net, RngStream::new(1)).unwrap();
        let cfg = InterventionConfig { peer_support_coverage: 0.5, ..InterventionConfig::default() };
        m.update(cfg).unwrap();
        assert_eq!(m.enrolled_count(), 5);
    }

    #[test]
    fn effects_are_pure() {
        let pop = mixed_states(30);
        let net = uneven(30);
        let cfg = InterventionConfig {
            digital_outreach:      true,
            peer_support_coverage: 0.3,
            ..InterventionConfig::default()
        };
        let m = InterventionManager::new(cfg, &net, RngStream::new(5)).unwrap();
        assert_eq!(m.effects(&pop), m.effects(&pop));
    }
}
